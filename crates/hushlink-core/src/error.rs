use thiserror::Error;

pub type HushResult<T> = Result<T, HushError>;

#[derive(Debug, Error)]
pub enum HushError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for HushError {
    fn from(e: toml::de::Error) -> Self {
        HushError::Config(e.to_string())
    }
}
