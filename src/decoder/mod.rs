//! Barcode decoding
//!
//! Symbol decoding is delegated to rxing (a ZXing port) restricted to
//! PDF417, the symbology IATA uses for bar-coded boarding passes.

use crate::error::Result;

/// PDF417 decoder over an 8-bit luminance buffer
pub mod pdf417;

pub use pdf417::Pdf417Decoder;

/// Decodes one symbol from a row-major 8-bit luma buffer
pub trait LumaDecoder: Send {
    /// `Ok(None)` when the image holds no readable symbol
    fn decode(&mut self, luma: &[u8], width: usize, height: usize) -> Result<Option<String>>;
}
