//! Behavioural tests for the YUV 4:2:0 to NV21 reformatter
//!
//! These cover the layouts Android cameras actually deliver: planar and
//! semi-planar chroma, padded row strides, crops, and short plane buffers.

use boarding_pass_scanner::tools::semi_planar_frame;
use boarding_pass_scanner::utils::yuv::{Conversion, output_len, yuv420_to_nv21};
use boarding_pass_scanner::{CropRect, FrameBuffer, PixelFormat, Plane, ScanError};

fn planar_frame(width: usize, height: usize, row_stride: usize, luma: u8) -> FrameBuffer {
    let chroma_stride = row_stride / 2;
    let ch = height.div_ceil(2);
    FrameBuffer::new(
        width,
        height,
        PixelFormat::Yuv420_888,
        vec![
            Plane::new(vec![luma; row_stride * height], row_stride, 1),
            Plane::new(vec![90; chroma_stride * ch], chroma_stride, 1),
            Plane::new(vec![160; chroma_stride * ch], chroma_stride, 1),
        ],
    )
}

#[test]
fn test_output_length_matches_crop() {
    // Odd frame sizes are cropped down to even regions first
    let cases = [
        (4, 4, CropRect::full(4, 4)),
        (640, 480, CropRect::full(640, 480)),
        (641, 481, CropRect::new(0, 0, 640, 480)),
        (7, 5, CropRect::new(1, 1, 7, 5)),
        (1280, 720, CropRect::new(320, 180, 960, 540)),
    ];

    for (width, height, crop) in cases {
        let frame = planar_frame(width, height, width + (width % 2), 10).with_crop(crop);
        let conversion = yuv420_to_nv21(&frame);
        assert!(!conversion.is_degraded());
        let image = conversion.into_image();
        assert_eq!(
            image.data().len(),
            crop.width() * crop.height() * 12 / 8,
            "frame {}x{} crop {:?}",
            width,
            height,
            crop
        );
        assert_eq!(image.data().len(), output_len(crop.width(), crop.height()));
    }
}

#[test]
fn test_constant_luma_survives_padded_strides() {
    for padding in [0usize, 2, 16, 64] {
        let frame = planar_frame(32, 24, 32 + padding, 77);
        let image = yuv420_to_nv21(&frame).into_image();
        assert!(
            image.luma().iter().all(|&b| b == 77),
            "padding {} leaked into luma",
            padding
        );
        assert_eq!(image.luma().len(), 32 * 24);
    }
}

#[test]
fn test_semi_planar_chroma_lands_on_even_and_odd_offsets() {
    // Hardware NV21 buffer for a 4x4 frame: V00 U00 V01 U01 / V10 U10 V11 U11.
    // The V plane views it from offset 0, the U plane from offset 1, both with
    // pixel stride 2 and row stride 4; each view stops at its last sample.
    let interleaved = [200u8, 100, 201, 101, 202, 102, 203, 103];
    let v_view = interleaved[..7].to_vec();
    let u_view = interleaved[1..].to_vec();
    let frame = FrameBuffer::new(
        4,
        4,
        PixelFormat::Yuv420_888,
        vec![
            Plane::new((0..16).collect(), 4, 1),
            Plane::new(u_view, 4, 2),
            Plane::new(v_view, 4, 2),
        ],
    );

    let image = yuv420_to_nv21(&frame).into_image();
    assert_eq!(image.luma(), (0..16).collect::<Vec<u8>>().as_slice());
    assert_eq!(image.chroma(), &[200, 100, 201, 101, 202, 102, 203, 103]);
    assert_eq!(image.chroma_at(1, 0), (201, 101));
    assert_eq!(image.chroma_at(0, 1), (202, 102));
}

#[test]
fn test_nv12_ordered_hardware_still_produces_vu() {
    // Same frame from hardware that stores U first (U00 V00 U01 V01 ...)
    let interleaved = [100u8, 200, 101, 201, 102, 202, 103, 203];
    let u_view = interleaved[..7].to_vec();
    let v_view = interleaved[1..].to_vec();
    let frame = FrameBuffer::new(
        4,
        4,
        PixelFormat::Yuv420_888,
        vec![
            Plane::new(vec![0; 16], 4, 1),
            Plane::new(u_view, 4, 2),
            Plane::new(v_view, 4, 2),
        ],
    );

    let image = yuv420_to_nv21(&frame).into_image();
    assert_eq!(image.chroma(), &[200, 100, 201, 101, 202, 102, 203, 103]);
}

#[test]
fn test_format_mismatch_yields_blank_buffer() {
    for format in [PixelFormat::Nv21, PixelFormat::Rgba8888, PixelFormat::Other(0x100)] {
        let frame = FrameBuffer::new(
            8,
            6,
            format,
            vec![Plane::new(vec![255; 8 * 6 * 4], 8 * 4, 4)],
        );
        let conversion = yuv420_to_nv21(&frame);
        match &conversion {
            Conversion::Degraded { image, cause } => {
                assert_eq!(image.data().len(), 8 * 6 * 12 / 8);
                assert!(image.is_blank());
                assert!(matches!(
                    cause,
                    ScanError::FormatMismatch {
                        expected: PixelFormat::Yuv420_888,
                        ..
                    }
                ));
            }
            Conversion::Converted(_) => panic!("{:?} should not convert", format),
        }
        assert!(conversion.into_result().is_err());
    }
}

#[test]
fn test_short_luma_buffer_copies_prefix_only() {
    // Last row holds only 2 of its 4 bytes
    let luma: Vec<u8> = (1..=14).collect();
    let frame = FrameBuffer::new(
        4,
        4,
        PixelFormat::Yuv420_888,
        vec![
            Plane::new(luma.clone(), 4, 1),
            Plane::new(vec![50; 4], 2, 1),
            Plane::new(vec![60; 4], 2, 1),
        ],
    );

    let image = yuv420_to_nv21(&frame).into_image();
    assert_eq!(&image.luma()[..14], luma.as_slice());
    assert_eq!(&image.luma()[14..], &[0, 0]);
    assert_eq!(image.chroma(), &[60, 50, 60, 50, 60, 50, 60, 50]);
}

#[test]
fn test_short_chroma_buffer_leaves_tail_blank() {
    // U plane is missing its whole second row
    let frame = FrameBuffer::new(
        4,
        4,
        PixelFormat::Yuv420_888,
        vec![
            Plane::new(vec![1; 16], 4, 1),
            Plane::new(vec![50, 51], 2, 1),
            Plane::new(vec![60, 61, 62, 63], 2, 1),
        ],
    );

    let image = yuv420_to_nv21(&frame).into_image();
    assert_eq!(image.chroma(), &[60, 50, 61, 51, 62, 0, 63, 0]);
}

#[test]
fn test_padded_semi_planar_frame() {
    let (width, height) = (64, 48);
    let luma: Vec<u8> = (0..width * height).map(|i| (i % 251) as u8).collect();
    let frame = semi_planar_frame(&luma, width, height, 32).unwrap();

    let image = yuv420_to_nv21(&frame).into_image();
    assert_eq!(image.luma(), luma.as_slice());
    assert_eq!(image.chroma().len(), width * height / 2);
    assert!(image.chroma().iter().all(|&b| b == 128));
}

#[test]
fn test_frame_is_not_released_by_reformatting() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    let released = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&released);
    let frame = planar_frame(4, 4, 4, 1).on_release(move || flag.store(true, Ordering::SeqCst));

    let _ = yuv420_to_nv21(&frame);
    assert!(!released.load(Ordering::SeqCst));
    drop(frame);
    assert!(released.load(Ordering::SeqCst));
}
