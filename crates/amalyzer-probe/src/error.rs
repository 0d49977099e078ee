use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    Unsupported(&'static str),

    #[error("decode: {0}")]
    Decode(String),

    #[error("metadata: {0}")]
    Metadata(String),
}
