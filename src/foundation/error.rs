/// Convenience result type used across rifxkit.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Top-level error taxonomy used by reader and writer APIs.
///
/// Only [`ArchiveError::Signature`] and [`ArchiveError::Map`] abort a read. The remaining
/// variants are raised inside per-resource work and are downgraded to empty payloads there.
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    /// No container signature could be located.
    #[error("signature error: {0}")]
    Signature(String),

    /// The resource map or segmented directory is unreadable.
    #[error("map error: {0}")]
    Map(String),

    /// A read ran past the end of the available bytes.
    #[error("unexpected end of data at offset {offset:#x}: need {need} bytes, have {have}")]
    UnexpectedEof {
        /// Cursor position when the read was attempted.
        offset: usize,
        /// Bytes requested.
        need: usize,
        /// Bytes remaining.
        have: usize,
    },

    /// A compressed segment could not be inflated.
    #[error("decompression error: {0}")]
    Decompress(String),

    /// Invalid caller-provided data (writers, tag construction).
    #[error("validation error: {0}")]
    Validation(String),

    /// Underlying IO failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArchiveError {
    /// Build a [`ArchiveError::Signature`] value.
    pub fn signature(msg: impl Into<String>) -> Self {
        Self::Signature(msg.into())
    }

    /// Build a [`ArchiveError::Map`] value.
    pub fn map(msg: impl Into<String>) -> Self {
        Self::Map(msg.into())
    }

    /// Build a [`ArchiveError::Decompress`] value.
    pub fn decompress(msg: impl Into<String>) -> Self {
        Self::Decompress(msg.into())
    }

    /// Build a [`ArchiveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error aborts a whole read pass rather than a single resource.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Signature(_) | Self::Map(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
