use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/secret`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSecretRequest {
    /// base64url text of the envelope bytes
    pub data: String,
    /// Time-to-live in seconds
    pub duration: u64,
}

/// Success body of `POST /api/v1/secret`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSecretResponse {
    pub id: String,
}

/// Success body of `GET /api/v1/secret/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSecretResponse {
    pub data: String,
}

/// Body of every non-2xx response from the storage service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Sum an hours/minutes/seconds triple into whole seconds.
///
/// Returns `None` on overflow.
pub fn duration_from_parts(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}
