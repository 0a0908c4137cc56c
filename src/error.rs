use thiserror::Error;

use crate::models::PixelFormat;

/// Errors produced while reformatting or decoding camera frames
#[derive(Error, Debug)]
pub enum ScanError {
    /// The frame is not in the planar 4:2:0 layout the reformatter reads
    #[error("Unexpected pixel format: expected {expected:?}, got {actual:?}")]
    FormatMismatch {
        /// Format the reformatter accepts
        expected: PixelFormat,
        /// Format the camera delivered
        actual: PixelFormat,
    },

    /// Crop or image size that cannot hold 4:2:0 data
    #[error("Invalid frame dimensions: width={width}, height={height}")]
    InvalidDimensions {
        /// Width in pixels
        width: usize,
        /// Height in pixels
        height: usize,
    },

    /// Caller-provided output buffer has the wrong length
    #[error("Output buffer has {actual} bytes, expected {expected}")]
    BufferSize {
        /// Required length
        expected: usize,
        /// Provided length
        actual: usize,
    },

    /// Decoder failure other than "no symbol found"
    #[error("Barcode decoder failed: {0}")]
    Decoder(String),

    /// The analysis worker has stopped
    #[error("Frame analyzer is no longer running")]
    Disconnected,

    /// Still image could not be opened or decoded
    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),

    /// Reading or writing raw frame files failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Whether the scanning session can carry on with the next frame
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScanError::Disconnected)
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ScanError>;
