/// Crate-wide result alias.
pub type ApproxResult<T> = Result<T, ApproxError>;

/// Error type shared by the approximation engine, sources, sinks and playback.
#[derive(thiserror::Error, Debug)]
pub enum ApproxError {
    /// Invalid configuration or mismatched surface geometry. Raised at construction time.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source frame data was malformed or could not be produced.
    #[error("source error: {0}")]
    Source(String),

    /// Raster operation failed (region out of bounds, rasterizer limits).
    #[error("raster error: {0}")]
    Raster(String),

    /// Output encoding failed (external encoder missing, crashed or rejected input).
    #[error("encode error: {0}")]
    Encode(String),

    /// Recording or config (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped I/O or third-party failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApproxError {
    /// Build an [`ApproxError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ApproxError::Source`].
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build an [`ApproxError::Raster`].
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build an [`ApproxError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`ApproxError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
