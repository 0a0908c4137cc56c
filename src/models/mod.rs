/// Camera frames, planes and crop rectangles
pub mod frame;
/// NV21 output images
pub mod nv21;
/// Per-frame analysis results
pub mod outcome;
/// Decoded boarding passes
pub mod pass;

pub use frame::{CropRect, FrameBuffer, PixelFormat, Plane};
pub use nv21::{NV21_BITS_PER_PIXEL, Nv21Image};
pub use outcome::ScanOutcome;
pub use pass::ScannedPass;
