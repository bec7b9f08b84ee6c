use thiserror::Error;

/// Main error type for subtitle conversion and the track host
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The source handed to the converter is not a blob
    #[error("Expecting resource to be a Blob but {0} found")]
    InvalidSource(String),

    /// The host reader lacks a primitive the conversion needs
    #[error("No {0} available in the host environment")]
    MissingCapability(&'static str),

    /// The raw-buffer read failed at the host level
    #[error("Error while reading the Blob object: {0}")]
    Read(String),

    /// The raw-buffer read completed without a binary payload
    #[error("Invalid load result: expected a binary buffer")]
    InvalidLoadResult,

    /// Strict UTF-8 decoding hit an invalid byte sequence
    #[error("Malformed UTF-8 at byte offset {valid_up_to}")]
    MalformedUtf8 { valid_up_to: usize },

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ConvertError>;
