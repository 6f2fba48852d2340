//! Error types for Pydantic code generation

use thiserror::Error;

/// Result type alias for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Error type for generator operations
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Field kind with no Python mapping (proto2 groups)
    #[error("field {field}: unsupported field kind: {kind}")]
    UnsupportedField { field: String, kind: String },

    /// Plugin parameter key that the generator does not understand
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Plugin parameter with a value that cannot be parsed
    #[error("invalid value for parameter {key}: {reason}")]
    InvalidParameter { key: String, reason: String },

    /// Configuration could not be deserialized
    #[error("configuration error: {0}")]
    Config(String),

    /// File requested for generation is absent from the descriptor set
    #[error("file not found in descriptor set: {0}")]
    FileNotFound(String),

    /// Error raised while processing a schema file
    #[error("processing {path}: {source}")]
    File {
        path: String,
        #[source]
        source: Box<GeneratorError>,
    },

    /// Error raised inside a nested message
    #[error("message {name}: {source}")]
    Message {
        name: String,
        #[source]
        source: Box<GeneratorError>,
    },
}

impl GeneratorError {
    /// Attach the schema file path to this error
    pub fn in_file(self, path: impl Into<String>) -> Self {
        GeneratorError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Attach a nested message name to this error
    pub fn in_message(self, name: impl Into<String>) -> Self {
        GeneratorError::Message {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        GeneratorError::Config(err.to_string())
    }
}
