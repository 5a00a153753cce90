use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a comparison or a replacement batch.
///
/// Failing to find a snippet or an anchor while patching is not represented
/// here: the patcher degrades to a no-op or an end-of-document append instead.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid replacement payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to apply replacement '{key}': {source}")]
    Instruction {
        key: String,
        #[source]
        source: Box<ReconcileError>,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] confy::ConfyError),
}

impl ReconcileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn for_key(key: &str, source: ReconcileError) -> Self {
        Self::Instruction {
            key: key.to_string(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
