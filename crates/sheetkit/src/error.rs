//! Sheet error types
//!
//! Only configuration handling can fail. Presentation, layout and gesture
//! handling never return errors: missing surfaces or incomplete payloads are
//! skipped and picked up again on the next event.

use thiserror::Error;

/// Sheet-related errors
#[derive(Error, Debug)]
pub enum SheetError {
    /// Configuration text could not be parsed
    #[error("Failed to parse sheet configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be written out
    #[error("Failed to serialize sheet configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid sheet configuration `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type for sheet operations
pub type Result<T> = std::result::Result<T, SheetError>;
