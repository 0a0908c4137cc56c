//! Helpers shared by the command-line tool, benchmarks and tests

use crate::decoder::{LumaDecoder, Pdf417Decoder};
use crate::error::{Result, ScanError};
use crate::models::{FrameBuffer, Nv21Image, PixelFormat, Plane};
use image::GenericImageView;
use rayon::prelude::*;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Longest edge still images are scaled down to, `None` when unset or zero
fn max_dim_from_env() -> Option<u32> {
    env::var("BPS_MAX_DIM")
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&dim| dim > 0)
}

/// Load an image file as luma bytes along with its dimensions.
///
/// Images larger than `BPS_MAX_DIM` (when set) are downscaled first.
pub fn load_luma<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize)> {
    let mut img = image::open(path)?;
    if let Some(max_dim) = max_dim_from_env() {
        let (w, h) = img.dimensions();
        if w.max(h) > max_dim {
            img = img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle);
        }
    }
    let luma = img.to_luma8();
    let (width, height) = (luma.width() as usize, luma.height() as usize);
    Ok((luma.into_raw(), width, height))
}

/// Decode a boarding pass from a still image file
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    let (luma, width, height) = load_luma(path)?;
    Pdf417Decoder::new().decode(&luma, width, height)
}

/// Decode many image files in parallel, preserving input order
pub fn decode_images(paths: &[PathBuf]) -> Vec<(PathBuf, Result<Option<String>>)> {
    paths
        .par_iter()
        .map(|path| (path.clone(), decode_image(path)))
        .collect()
}

fn check_even(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
        return Err(ScanError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Build a frame from tightly packed I420 bytes (Y plane, then U, then V)
pub fn i420_frame(data: &[u8], width: usize, height: usize) -> Result<FrameBuffer> {
    check_even(width, height)?;
    let luma_len = width * height;
    let chroma_len = luma_len / 4;
    let expected = luma_len + 2 * chroma_len;
    if data.len() != expected {
        return Err(ScanError::BufferSize {
            expected,
            actual: data.len(),
        });
    }

    let (y, rest) = data.split_at(luma_len);
    let (u, v) = rest.split_at(chroma_len);
    Ok(FrameBuffer::new(
        width,
        height,
        PixelFormat::Yuv420_888,
        vec![
            Plane::new(y.to_vec(), width, 1),
            Plane::new(u.to_vec(), width / 2, 1),
            Plane::new(v.to_vec(), width / 2, 1),
        ],
    ))
}

/// Read a raw I420 file into a frame
pub fn read_i420_file<P: AsRef<Path>>(path: P, width: usize, height: usize) -> Result<FrameBuffer> {
    let data = fs::read(path)?;
    i420_frame(&data, width, height)
}

/// Write an NV21 image as raw bytes
pub fn write_nv21_file<P: AsRef<Path>>(path: P, image: &Nv21Image) -> Result<()> {
    fs::write(path, image.data())?;
    Ok(())
}

/// Build a frame the way many Android cameras lay out `YUV_420_888`:
/// padded luma rows and semi-planar chroma (pixel stride 2) where the U and
/// V planes are views into one interleaved buffer. Chroma is neutral grey.
pub fn semi_planar_frame(luma: &[u8], width: usize, height: usize, row_padding: usize) -> Result<FrameBuffer> {
    check_even(width, height)?;
    if luma.len() < width * height {
        return Err(ScanError::BufferSize {
            expected: width * height,
            actual: luma.len(),
        });
    }

    let row_stride = width + row_padding;
    let mut y = vec![0u8; row_stride * (height - 1) + width];
    for (row, src) in luma.chunks_exact(width).take(height).enumerate() {
        y[row * row_stride..row * row_stride + width].copy_from_slice(src);
    }

    // Interleaved chroma rows are `width` bytes; the last row stops at the
    // final sample, so each view is one byte short of a full stride.
    let chroma_rows = height / 2;
    let chroma_len = row_stride * (chroma_rows - 1) + width - 1;
    let chroma = vec![128u8; chroma_len];

    Ok(FrameBuffer::new(
        width,
        height,
        PixelFormat::Yuv420_888,
        vec![
            Plane::new(y, row_stride, 1),
            Plane::new(chroma.clone(), row_stride, 2),
            Plane::new(chroma, row_stride, 2),
        ],
    ))
}
