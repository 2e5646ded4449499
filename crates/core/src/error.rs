use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Per-file failure. Recorded in the report; never aborts a batch.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error("cannot read {}: {message}", path.display())]
    SourceUnavailable { path: PathBuf, message: String },

    #[error("cannot build AST for {}: {message}", path.display())]
    ParseFailure { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    SourceUnavailable,
    ParseFailure,
}

impl AnalysisError {
    pub fn source_unavailable(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn parse_failure(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ParseFailure {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            Self::ParseFailure { .. } => ErrorKind::ParseFailure,
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            Self::SourceUnavailable { path, .. } | Self::ParseFailure { path, .. } => path,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::SourceUnavailable { message, .. } | Self::ParseFailure { message, .. } => message,
        }
    }
}
