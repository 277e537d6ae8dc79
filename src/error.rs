//! Fatal conditions for one document. Any of these aborts that document only.
use thiserror::Error;

use crate::path::JsonPath;
use crate::value::ValueError;

/// Identifier used when a document fails before its `exercise` key is read.
pub const UNNAMED_DOCUMENT: &str = "<unnamed>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Required keys missing or mistyped, at the top level or inside a test item.
    #[error("malformed document `{document}` at {path}: {reason}")]
    MalformedDocument {
        document: String,
        path: JsonPath,
        reason: String,
    },
    /// A raw value outside the closed typed-value set.
    #[error("unclassifiable value in `{document}` at {path}: {shape}")]
    UnclassifiableValue {
        document: String,
        path: JsonPath,
        shape: String,
    },
    /// An input value shaped like the expected-only error sentinel.
    #[error("malformed input in `{document}` at {path}: `error` sentinel is reserved for expected values (message: {message:?})")]
    MalformedInput {
        document: String,
        path: JsonPath,
        message: String,
    },
}

impl SpecError {
    pub fn malformed(document: &str, path: &JsonPath, reason: impl Into<String>) -> Self {
        SpecError::MalformedDocument {
            document: document.to_string(),
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// Attach the document identifier to a classifier failure.
    pub fn from_value_error(document: &str, error: ValueError) -> Self {
        match error {
            ValueError::Unclassifiable { path, shape } => SpecError::UnclassifiableValue {
                document: document.to_string(),
                path,
                shape,
            },
            ValueError::MalformedInput { path, message } => SpecError::MalformedInput {
                document: document.to_string(),
                path,
                message,
            },
        }
    }

    pub fn document(&self) -> &str {
        match self {
            SpecError::MalformedDocument { document, .. }
            | SpecError::UnclassifiableValue { document, .. }
            | SpecError::MalformedInput { document, .. } => document,
        }
    }

    pub fn path(&self) -> &JsonPath {
        match self {
            SpecError::MalformedDocument { path, .. }
            | SpecError::UnclassifiableValue { path, .. }
            | SpecError::MalformedInput { path, .. } => path,
        }
    }
}
