/// Convenience result type used across Routeshot.
pub type RouteResult<T> = Result<T, RouteError>;

/// Top-level error taxonomy used by crate APIs.
///
/// Every variant is recoverable: a frontend reports the message and keeps
/// its prior state, so no failure here is fatal to the process.
#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    /// Malformed track-file content.
    #[error("track parse error: {0}")]
    Parse(String),

    /// Track format accepted for selection but not parseable (e.g. FIT).
    #[error("unsupported track format: {0}")]
    UnsupportedFormat(String),

    /// Background image bytes could not be decoded.
    #[error("image decode error: {0}")]
    Decode(String),

    /// Composite render or PNG write failed.
    #[error("export error: {0}")]
    Export(String),

    /// Invalid user-provided arguments or state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouteError {
    /// Build a [`RouteError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`RouteError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`RouteError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RouteError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`RouteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
