//! Camera frame to boarding-pass text, with PDF417 symbols rendered by rxing

use boarding_pass_scanner::tools::{i420_frame, semi_planar_frame};
use boarding_pass_scanner::{ScanConfig, ScanOutcome, ScannedPass, Scanner, SessionEvent, decode_frame};
use rxing::pdf417::PDF417Writer;
use rxing::{BarcodeFormat, Writer};
use std::time::Duration;

const BCBP: &str = "M1DESMARAIS/LUC       EABC123 YULFRAAC 0834 326J001A0025 100";

/// Render `text` as a PDF417 symbol into an even-sized luma buffer with a
/// white border
fn render_pdf417(text: &str) -> (Vec<u8>, usize, usize) {
    let matrix = PDF417Writer::default()
        .encode(text, &BarcodeFormat::PDF_417, 600, 240)
        .expect("PDF417 encode");
    let (mw, mh) = (matrix.getWidth() as usize, matrix.getHeight() as usize);

    let border = 24;
    let width = (mw + 2 * border).next_multiple_of(2);
    let height = (mh + 2 * border).next_multiple_of(2);
    let mut luma = vec![255u8; width * height];
    for y in 0..mh {
        for x in 0..mw {
            if matrix.get(x as u32, y as u32) {
                luma[(y + border) * width + x + border] = 0;
            }
        }
    }
    (luma, width, height)
}

#[test]
fn test_semi_planar_camera_frame_decodes() {
    let (luma, width, height) = render_pdf417(BCBP);
    let frame = semi_planar_frame(&luma, width, height, 64).unwrap();

    match decode_frame(frame) {
        ScanOutcome::Decoded(text) => assert_eq!(text, BCBP),
        other => panic!("expected the boarding pass, got {other:?}"),
    }
}

#[test]
fn test_planar_camera_frame_decodes() {
    let (luma, width, height) = render_pdf417(BCBP);
    let mut i420 = luma.clone();
    i420.resize(width * height * 3 / 2, 128);
    let frame = i420_frame(&i420, width, height).unwrap();

    assert_eq!(decode_frame(frame).text(), Some(BCBP));
}

#[test]
fn test_json_payload_is_pretty_printed() {
    let payload = r#"{"flight":"AC834","seat":"1A"}"#;
    let (luma, width, height) = render_pdf417(payload);
    let frame = semi_planar_frame(&luma, width, height, 0).unwrap();

    let text = match decode_frame(frame) {
        ScanOutcome::Decoded(text) => text,
        other => panic!("expected the payload, got {other:?}"),
    };
    let shown = ScannedPass::new(text).display_text();
    assert!(shown.contains("\n    \"flight\": \"AC834\""));
}

#[test]
fn test_scanner_reads_pass_from_camera_thread() {
    let (luma, width, height) = render_pdf417(BCBP);
    let mut scanner = Scanner::new(ScanConfig::default().with_timeout(Duration::from_secs(10))).unwrap();
    assert!(scanner.begin_scan());

    let sink = scanner.frame_sink();
    let camera = std::thread::spawn(move || {
        let frame = semi_planar_frame(&luma, width, height, 16).unwrap();
        sink.submit(frame)
    });
    assert!(camera.join().unwrap());

    let mut decoded = None;
    while let Some(event) = scanner.next_event() {
        match event {
            SessionEvent::Decoded(pass) => {
                decoded = Some(pass);
                break;
            }
            SessionEvent::TimedOut => break,
            _ => {}
        }
    }
    assert_eq!(decoded.map(|pass| pass.raw).as_deref(), Some(BCBP));
    scanner.shutdown();
}

#[test]
fn test_blank_frame_finds_nothing() {
    let frame = semi_planar_frame(&vec![255u8; 320 * 240], 320, 240, 32).unwrap();
    assert!(matches!(decode_frame(frame), ScanOutcome::NotFound));
}
