use thiserror::Error;

#[derive(Error, Debug)]
pub enum LecternError {
    /// Transport, HTTP status or decoding failure from the lecture API.
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for LecternError {
    fn from(err: reqwest::Error) -> Self {
        LecternError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LecternError>;
