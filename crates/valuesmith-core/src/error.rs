//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A sequence directly containing another sequence
    #[error("Unsupported value shape at '{path}': lists of lists cannot be expressed as overrides")]
    UnsupportedShape { path: String },

    /// An override group whose root is not a mapping
    #[error("Invalid {group} group: {message}")]
    InvalidOverrideGroup { group: String, message: String },

    /// A values document whose root is not a mapping
    #[error("Values document at {path} must contain a mapping at its root")]
    DocumentShape { path: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
