/// Convenience result type used across Flipbook.
pub type FlipbookResult<T> = Result<T, FlipbookError>;

/// Top-level error taxonomy used by the compositing, playback and asset APIs.
#[derive(thiserror::Error, Debug)]
pub enum FlipbookError {
    /// Character id is not of the form `{category}.{name}`.
    #[error("malformed character id: {0}")]
    MalformedId(String),

    /// A part name, abstract face key, expression or image name is missing from its table.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Character `face` field has a shape the resolver does not handle.
    #[error("unhandled face shape: {0}")]
    UnhandledShape(String),

    /// JSON or image could not be fetched or decoded.
    #[error("load error for '{path}': {source:#}")]
    Load {
        /// Path handed to the loader.
        path: String,
        /// Underlying cause.
        #[source]
        source: anyhow::Error,
    },

    /// JSON was fetched but did not parse into the expected document.
    #[error("parse error for '{path}': {source:#}")]
    Parse {
        /// Path handed to the loader.
        path: String,
        /// Underlying cause.
        #[source]
        source: anyhow::Error,
    },

    /// Animation data requested from an expression that does not carry it.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Invalid user-provided values (configs, sizes, paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipbookError {
    /// Build a [`FlipbookError::MalformedId`] value.
    pub fn malformed_id(id: impl Into<String>) -> Self {
        Self::MalformedId(id.into())
    }

    /// Build a [`FlipbookError::UnresolvedReference`] value.
    pub fn unresolved(msg: impl Into<String>) -> Self {
        Self::UnresolvedReference(msg.into())
    }

    /// Build a [`FlipbookError::UnhandledShape`] value.
    pub fn unhandled_shape(msg: impl Into<String>) -> Self {
        Self::UnhandledShape(msg.into())
    }

    /// Build a [`FlipbookError::Load`] value.
    pub fn load(path: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Build a [`FlipbookError::Parse`] value.
    pub fn parse(path: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Parse {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Build a [`FlipbookError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`FlipbookError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
