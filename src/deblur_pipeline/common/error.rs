use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeblurError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Singular operator: {0}")]
    SingularOperator(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeblurError>;
