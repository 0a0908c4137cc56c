use rxing::common::HybridBinarizer;
use rxing::pdf417::PDF417Reader;
use rxing::{BinaryBitmap, Exceptions, Luma8LuminanceSource, Reader};
use tracing::debug;

use super::LumaDecoder;
use crate::error::{Result, ScanError};
use crate::models::Nv21Image;

/// PDF417-only decoder backed by rxing
#[derive(Default)]
pub struct Pdf417Decoder {
    reader: PDF417Reader,
}

impl Pdf417Decoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the luma plane of an NV21 image
    pub fn decode_nv21(&mut self, image: &Nv21Image) -> Result<Option<String>> {
        self.decode(image.luma(), image.width(), image.height())
    }
}

impl LumaDecoder for Pdf417Decoder {
    fn decode(&mut self, luma: &[u8], width: usize, height: usize) -> Result<Option<String>> {
        if width == 0 || height == 0 {
            return Ok(None);
        }
        let pixel_count = width * height;
        if luma.len() < pixel_count {
            return Err(ScanError::BufferSize {
                expected: pixel_count,
                actual: luma.len(),
            });
        }

        let source = Luma8LuminanceSource::new(luma[..pixel_count].to_vec(), width as u32, height as u32);
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));

        match self.reader.decode(&mut bitmap) {
            Ok(result) => {
                debug!(chars = result.getText().len(), "PDF417 symbol decoded");
                Ok(Some(result.getText().to_string()))
            }
            // Finder misses and unreadable codewords both mean "nothing usable here"
            Err(
                Exceptions::NotFoundException(_)
                | Exceptions::FormatException(_)
                | Exceptions::ChecksumException(_),
            ) => Ok(None),
            Err(e) => Err(ScanError::Decoder(format!("{e:?}"))),
        }
    }
}

impl std::fmt::Debug for Pdf417Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf417Decoder").finish_non_exhaustive()
    }
}
