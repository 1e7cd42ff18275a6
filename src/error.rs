use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrackError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Key: {0}")]
    InvalidKey(String),

    #[error("Invalid Parameter: {0}")]
    InvalidParameter(String),

    #[error("Symbol '{0}' is not part of the alphabet")]
    SymbolNotInAlphabet(char),

    #[error("Dataset Error: {0}")]
    Dataset(String),

    #[error("Another job is already in flight")]
    Busy,
}

pub type CrackResult<T> = Result<T, CrackError>;
