//! Benchmarks for filmlab operations.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use filmlab_io::ImageData;
use filmlab_lut::{Lut, ParseOptions, flt};
use filmlab_ops::filter::gaussian_blur;
use filmlab_ops::grain::apply_grain;
use filmlab_ops::{TransformParams, apply_lut, encode_jpeg, prepare_base};

fn gradient(width: u32, height: u32) -> ImageData {
    let mut img = ImageData::filled(width, height, [0, 0, 0]);
    for y in 0..height {
        for x in 0..width {
            img.set_pixel(x, y, [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
        }
    }
    img
}

/// Full base stage at a few common sizes.
fn bench_prepare_base(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_base");
    group.sample_size(20);
    let params = TransformParams { seed: Some(1), ..Default::default() };

    for (w, h) in [(640, 480), (1920, 1080)] {
        let raw = gradient(w, h);
        group.throughput(Throughput::Elements((w * h) as u64));
        group.bench_with_input(BenchmarkId::new("default", format!("{}x{}", w, h)), &raw, |b, raw| {
            b.iter(|| prepare_base(black_box(raw), &params).unwrap())
        });
    }

    // Downscale path through the size cap
    let raw = gradient(3000, 2000);
    group.bench_function("capped_3000x2000", |b| {
        b.iter(|| prepare_base(black_box(&raw), &params).unwrap())
    });

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let (w, h) = (1920usize, 1080usize);
    let samples = vec![128.0f32; w * h * 3];
    group.throughput(Throughput::Elements((w * h) as u64));

    group.bench_function("blur_0.3", |b| {
        b.iter(|| gaussian_blur(black_box(&samples), w, h, 3, 0.3).unwrap())
    });

    group.bench_function("grain_12", |b| {
        b.iter_batched_ref(
            || samples.clone(),
            |data| apply_grain(data, w, h, 3, 12.0, Some(7)).unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_lut(c: &mut Criterion) {
    let mut group = c.benchmark_group("lut");
    let base = gradient(1920, 1080);
    let lut = Lut::gamma([0.85, 1.0, 1.2]);
    group.throughput(Throughput::Elements(1920 * 1080));

    group.bench_function("apply_1920x1080", |b| {
        b.iter(|| apply_lut(black_box(&base), &lut).unwrap())
    });

    let text = flt::format_filter(&lut, "Warm");
    group.bench_function("parse_filter", |b| {
        b.iter(|| flt::parse_str(black_box(&text), ParseOptions::lenient()).unwrap())
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let image = gradient(1920, 1080);
    c.bench_function("encode_jpeg_q95_444", |b| {
        b.iter(|| encode_jpeg(black_box(&image), 95).unwrap())
    });
}

criterion_group!(benches, bench_prepare_base, bench_stages, bench_lut, bench_encode);
criterion_main!(benches);
