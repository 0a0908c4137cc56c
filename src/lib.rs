//! Boarding pass scanner core
//!
//! Turns camera frames into boarding-pass text: planar YUV 4:2:0 frames are
//! reformatted into NV21, the luma plane is handed to a PDF417 decoder, and
//! a scan session with a coarse timeout turns per-frame results into events
//! for the UI.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Scanner settings (timeouts, worker naming)
pub mod config;
/// PDF417 decoding over luma buffers
pub mod decoder;
/// Error types
pub mod error;
/// Tracing subscriber setup for binaries
pub mod logger;
/// Core data structures (frames, planes, NV21 images, outcomes)
pub mod models;
/// Frame mailbox, analysis worker and scan session
pub mod pipeline;
/// File and synthesis helpers for tools, benches and tests
pub mod tools;
/// Pixel buffer conversions (YUV to NV21)
pub mod utils;

pub use config::ScanConfig;
pub use decoder::{LumaDecoder, Pdf417Decoder};
pub use error::{Result, ScanError};
pub use models::{CropRect, FrameBuffer, Nv21Image, PixelFormat, Plane, ScanOutcome, ScannedPass};
pub use pipeline::{FrameSink, Scanner, SessionEvent};
pub use utils::yuv::{Conversion, yuv420_to_nv21};

use pipeline::FrameAnalyzer;

/// Reformat and decode a single frame on the current thread.
///
/// The frame is released before this returns.
///
/// # Example
/// ```
/// use boarding_pass_scanner::{ScanOutcome, decode_frame, tools::i420_frame};
///
/// let frame = i420_frame(&vec![255u8; 64 * 48 * 3 / 2], 64, 48).unwrap();
/// assert!(matches!(decode_frame(frame), ScanOutcome::NotFound));
/// ```
pub fn decode_frame(frame: FrameBuffer) -> ScanOutcome {
    FrameAnalyzer::new(Pdf417Decoder::new()).analyze(frame)
}
