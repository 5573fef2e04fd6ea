/// Convenience result type used across photofit.
pub type PhotofitResult<T> = Result<T, PhotofitError>;

/// Top-level error taxonomy used by the pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum PhotofitError {
    /// The uploaded bytes are not a decodable JPEG, PNG or WEBP image.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The compositor was asked to render a zero-area or out-of-bounds crop.
    #[error("invalid crop state: {0}")]
    InvalidCropState(String),

    /// Export was requested before any crop was completed.
    #[error("no crop selected")]
    NoCropSelected,

    /// Encoding the rendered buffer into PNG bytes produced nothing.
    #[error("encode failure: {0}")]
    EncodeFailure(String),

    /// Invalid user-provided spec, catalogue or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotofitError {
    /// Build a [`PhotofitError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`PhotofitError::InvalidCropState`] value.
    pub fn invalid_crop(msg: impl Into<String>) -> Self {
        Self::InvalidCropState(msg.into())
    }

    /// Build a [`PhotofitError::EncodeFailure`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeFailure(msg.into())
    }

    /// Build a [`PhotofitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether retrying the same call can succeed without new user input.
    ///
    /// Only encode failures are transient; everything else needs a new upload or a valid crop.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EncodeFailure(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
