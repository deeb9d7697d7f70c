/// Convenience result type used across the crate.
pub type WingbeatResult<T> = Result<T, WingbeatError>;

/// Error type returned by every fallible `wingbeat` operation.
#[derive(thiserror::Error, Debug)]
pub enum WingbeatError {
    /// Precondition violation on parameters (frame counts, amplitudes, fractions, recipe values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Input raster is unusable (zero-size, missing alpha, inconsistent buffer length).
    #[error("invalid image: {0}")]
    Shape(String),

    /// Animated container encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Recipe (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, typically I/O with path context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WingbeatError {
    /// Build a [`WingbeatError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WingbeatError::Shape`].
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Build a [`WingbeatError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`WingbeatError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for caller-side precondition failures (bad parameters or bad input shape).
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Shape(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
