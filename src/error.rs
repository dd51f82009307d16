#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Callback error: {0}")]
    Callback(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schema document: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    pub fn callback(msg: impl Into<String>) -> Self {
        Error::Callback(msg.into())
    }
}
