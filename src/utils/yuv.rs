//! Planar YUV 4:2:0 to NV21 reformatting
//!
//! Camera pipelines deliver 4:2:0 frames as three planes, each with its own
//! row stride (rows may be padded) and pixel stride (chroma samples may be
//! interleaved with the other chroma channel). The decoder wants one NV21
//! buffer instead:
//!
//! ```text
//! Y Y Y Y Y Y Y Y     full-resolution luma, crop width x crop height
//! Y Y Y Y Y Y Y Y
//! V U V U V U V U     half-resolution chroma, V on even offsets, U on odd
//! ```

use tracing::{trace, warn};

use crate::error::{Result, ScanError};
use crate::models::{CropRect, FrameBuffer, Nv21Image, PixelFormat, Plane};

/// The only input format the reformatter reads
pub const EXPECTED_FORMAT: PixelFormat = PixelFormat::Yuv420_888;

/// Length of the NV21 buffer produced for a crop of the given size
pub fn output_len(crop_width: usize, crop_height: usize) -> usize {
    Nv21Image::byte_len(crop_width, crop_height)
}

/// Outcome of reformatting one frame
#[derive(Debug)]
pub enum Conversion {
    /// The frame was reformatted
    Converted(Nv21Image),
    /// The frame could not be read; `image` is a correctly sized, all-zero
    /// buffer so callers can carry on uniformly
    Degraded {
        /// Zero-filled output
        image: Nv21Image,
        /// Why the frame was not converted
        cause: ScanError,
    },
}

impl Conversion {
    /// The output buffer, converted or degraded
    pub fn image(&self) -> &Nv21Image {
        match self {
            Conversion::Converted(image) | Conversion::Degraded { image, .. } => image,
        }
    }

    /// Consume and return the output buffer, discarding the cause
    pub fn into_image(self) -> Nv21Image {
        match self {
            Conversion::Converted(image) | Conversion::Degraded { image, .. } => image,
        }
    }

    /// Whether the frame was rejected
    pub fn is_degraded(&self) -> bool {
        matches!(self, Conversion::Degraded { .. })
    }

    /// `Ok` with the converted image, or the cause of degradation
    pub fn into_result(self) -> Result<Nv21Image> {
        match self {
            Conversion::Converted(image) => Ok(image),
            Conversion::Degraded { cause, .. } => Err(cause),
        }
    }
}

/// Reformat a planar 4:2:0 frame into a freshly allocated NV21 image.
///
/// The output covers the frame's crop rectangle. Chroma planes are read at
/// half the crop (each edge divided by two), so crops should have even
/// dimensions. Rows that run past the end of a plane buffer are copied as
/// far as the buffer goes and the rest stays zero.
///
/// The frame is only read; releasing it is up to the caller.
pub fn yuv420_to_nv21(frame: &FrameBuffer) -> Conversion {
    let crop = frame.crop();
    let mut image = Nv21Image::zeroed(crop.width(), crop.height());

    if frame.format() != EXPECTED_FORMAT {
        warn!(
            expected = ?EXPECTED_FORMAT,
            actual = ?frame.format(),
            "frame is not planar 4:2:0, returning blank output"
        );
        return Conversion::Degraded {
            image,
            cause: ScanError::FormatMismatch {
                expected: EXPECTED_FORMAT,
                actual: frame.format(),
            },
        };
    }

    copy_planes(frame, image.data_mut());
    Conversion::Converted(image)
}

/// Reformat into a caller-provided buffer of exactly [`output_len`] bytes.
///
/// The crop must be non-empty with even dimensions. The buffer is zeroed
/// first, so on a format mismatch it is left blank and the error is returned.
pub fn yuv420_to_nv21_into(frame: &FrameBuffer, out: &mut [u8]) -> Result<()> {
    let crop = frame.crop();
    if crop.area() == 0 || !crop.is_even() {
        return Err(ScanError::InvalidDimensions {
            width: crop.width(),
            height: crop.height(),
        });
    }
    let expected = output_len(crop.width(), crop.height());
    if out.len() != expected {
        return Err(ScanError::BufferSize {
            expected,
            actual: out.len(),
        });
    }
    out.fill(0);

    if frame.format() != EXPECTED_FORMAT {
        return Err(ScanError::FormatMismatch {
            expected: EXPECTED_FORMAT,
            actual: frame.format(),
        });
    }

    copy_planes(frame, out);
    Ok(())
}

fn copy_planes(frame: &FrameBuffer, out: &mut [u8]) {
    let crop = frame.crop();
    let pixel_count = crop.area();

    if frame.planes().len() < 3 {
        warn!(
            planes = frame.planes().len(),
            "frame has missing planes, their output stays blank"
        );
    }

    for (plane_index, plane) in frame.planes().iter().enumerate().take(3) {
        // U lands on odd offsets and V on even ones: V U V U ...
        let (output_offset, output_stride) = match plane_index {
            0 => (0, 1),
            1 => (pixel_count + 1, 2),
            _ => (pixel_count, 2),
        };
        let plane_crop = if plane_index == 0 { crop } else { crop.halved() };
        copy_plane(plane, plane_crop, out, output_offset, output_stride);
    }
}

fn copy_plane(
    plane: &Plane,
    plane_crop: CropRect,
    out: &mut [u8],
    output_offset: usize,
    output_stride: usize,
) {
    let plane_width = plane_crop.width();
    let plane_height = plane_crop.height();
    if plane_width == 0 || plane_height == 0 {
        return;
    }

    let row_stride = plane.row_stride();
    let pixel_stride = if plane.pixel_stride() == 0 {
        warn!("plane reports a zero pixel stride, reading it as contiguous");
        1
    } else {
        plane.pixel_stride()
    };
    let contiguous = pixel_stride == 1 && output_stride == 1;
    let row_length = if contiguous {
        plane_width
    } else {
        (plane_width - 1) * pixel_stride + 1
    };

    for row in 0..plane_height {
        let position = (row + plane_crop.top) * row_stride + plane_crop.left * pixel_stride;
        let row_base = output_offset + row * plane_width * output_stride;

        if contiguous {
            let src = plane.read(position, row_length);
            let end = (row_base + src.len()).min(out.len());
            if row_base < end {
                out[row_base..end].copy_from_slice(&src[..end - row_base]);
            }
            if src.len() < row_length {
                trace!(row, copied = src.len(), wanted = row_length, "luma row underrun");
            }
            continue;
        }

        // Whole row stride when available: the last row of a plane is often
        // shorter than its stride.
        let src = plane.read(position, row_stride.max(row_length));
        for col in 0..plane_width {
            let Some(&sample) = src.get(col * pixel_stride) else {
                trace!(row, col, "chroma row underrun");
                break;
            };
            if let Some(dst) = out.get_mut(row_base + col * output_stride) {
                *dst = sample;
            }
        }
    }
}
