//! Errors raised by directory tree operations.

use crate::content::ContentKind;

/// Errors from creating, resolving or removing directory content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("no content with id '{0}'")]
    NotFound(String),
    #[error("content id '{0}' already exists")]
    DuplicateId(String),
    #[error("invalid content id '{0}': ids must be non-empty and must not contain '/'")]
    InvalidId(String),
    #[error("{kind} cannot be created {}", container_phrase(.container))]
    InvalidContainer {
        kind: ContentKind,
        container: Option<ContentKind>,
    },
    #[error("'{id}' is {found} content, expected {expected}")]
    WrongKind {
        id: String,
        expected: ContentKind,
        found: ContentKind,
    },
    #[error("unknown {vocabulary} term '{token}'{}", suggestion_phrase(.suggestion))]
    UnknownTerm {
        vocabulary: String,
        token: String,
        suggestion: Option<String>,
    },
    #[error("held position '{id}' must reference a position or an organization, not '{target}'")]
    InvalidReference { id: String, target: String },
    #[error("cannot remove '{id}': still referenced by held position '{referrer}'")]
    Referenced { id: String, referrer: String },
    #[error("{kind} is missing required field '{field}'")]
    MissingField { kind: ContentKind, field: &'static str },
}

fn container_phrase(container: &Option<ContentKind>) -> String {
    match container {
        Some(kind) => format!("inside {kind} content"),
        None => "at the top level".to_string(),
    }
}

fn suggestion_phrase(suggestion: &Option<String>) -> String {
    suggestion
        .as_deref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}
