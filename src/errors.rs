use thiserror::Error;

use crate::stage::StageKind;

/// Errors surfaced to the caller synchronously, before any collaborator is contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("unsupported media type: {0} (please upload an image file such as JPEG or PNG)")]
    UnsupportedMediaType(String),
    #[error("reference image too large: {size} bytes (maximum {max} bytes)")]
    PayloadTooLarge { size: u64, max: u64 },
    #[error("cannot read reference image: {0}")]
    UnreadableReference(String),
    #[error("{0}")]
    Precondition(String),
    #[error("{0} stage is already running")]
    Busy(StageKind),
}

/// Outcome of a failed collaborator call. Folded into a stage's `Failed(message)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("{status} - {detail}")]
    Status { status: u16, detail: String },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    MissingArtifact(String),
    #[error("generated but returned empty content")]
    Empty,
    #[error("could not read reference image: {0}")]
    Reference(String),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<EncodeError> for CallError {
    fn from(e: EncodeError) -> Self {
        CallError::Reference(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
