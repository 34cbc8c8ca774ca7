pub mod config;
pub mod error;
pub mod types;

pub use error::{HushError, HushResult};

/// Collection endpoint of the storage service (POST creates, GET `/{id}` fetches)
pub const SECRET_API_PATH: &str = "/api/v1/secret";

/// Path prefix of a share link; the secret id follows it
pub const VIEW_PATH: &str = "/view/";
