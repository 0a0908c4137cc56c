use boarding_pass_scanner::tools::{i420_frame, semi_planar_frame};
use boarding_pass_scanner::utils::yuv::{output_len, yuv420_to_nv21, yuv420_to_nv21_into};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_planar_640x480(c: &mut Criterion) {
    let frame = i420_frame(&vec![128u8; 640 * 480 * 3 / 2], 640, 480).unwrap();
    c.bench_function("yuv420_to_nv21_planar_640x480", |b| {
        b.iter(|| yuv420_to_nv21(black_box(&frame)))
    });
}

fn bench_semi_planar_1280x720(c: &mut Criterion) {
    let frame = semi_planar_frame(&vec![128u8; 1280 * 720], 1280, 720, 64).unwrap();
    c.bench_function("yuv420_to_nv21_semi_planar_1280x720", |b| {
        b.iter(|| yuv420_to_nv21(black_box(&frame)))
    });
}

fn bench_semi_planar_1920x1080_into(c: &mut Criterion) {
    let frame = semi_planar_frame(&vec![128u8; 1920 * 1080], 1920, 1080, 128).unwrap();
    let mut out = vec![0u8; output_len(1920, 1080)];
    c.bench_function("yuv420_to_nv21_into_semi_planar_1920x1080", |b| {
        b.iter(|| yuv420_to_nv21_into(black_box(&frame), black_box(&mut out)))
    });
}

criterion_group!(
    benches,
    bench_planar_640x480,
    bench_semi_planar_1280x720,
    bench_semi_planar_1920x1080_into
);
criterion_main!(benches);
