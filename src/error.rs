//! Error types for colpick

use thiserror::Error;

/// Result type alias for colpick operations
pub type Result<T> = std::result::Result<T, ColpickError>;

#[derive(Error, Debug)]
pub enum ColpickError {
    /// Fewer points than requested clusters, so initialization cannot pick k distinct seeds
    #[error("Insufficient data: {points} point(s) supplied for {k} cluster(s)")]
    InsufficientData { points: usize, k: usize },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Image bytes could not be decoded
    #[error("Unable to decode image: {message}")]
    ImageDecode {
        message: String,
        #[source]
        source: image::ImageError,
    },
}

impl ColpickError {
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    pub fn image_decode(source: image::ImageError) -> Self {
        Self::ImageDecode {
            message: source.to_string(),
            source,
        }
    }
}
