//! Pixel buffer conversions
//!
//! - YUV 4:2:0 camera frames to NV21 (the decoder's input layout)

/// YUV 4:2:0 to NV21
pub mod yuv;
