//! Benchmarks for texture extraction and heightmap normalization.
//!
//! Run with: cargo bench --package terrain-processor --bench pipeline_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use terrain_common::{PipelineConfig, ResampleFilter};
use terrain_processor::{HeightmapNormalizer, TextureExtractor};

/// Contour-like test map: banded tints with thin dark lines every 32 px.
fn generate_contour_map(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let band = ((x + y) / 64 % 256) as u8;
        if (x + 2 * y) % 32 == 0 {
            Rgb([40, 30, 20])
        } else {
            Rgb([120u8.wrapping_add(band.wrapping_mul(9)), 180, 90u8.wrapping_add(band.wrapping_mul(5))])
        }
    })
}

/// Smooth elevation-like field.
fn generate_elevation(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width as f32 * std::f32::consts::PI * 3.0;
        let fy = y as f32 / height as f32 * std::f32::consts::PI * 2.0;
        Luma([((fx.sin() * fy.cos() + 1.0) * 127.5) as u8])
    })
}

fn bench_texture_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("texture_extract");
    group.sample_size(10);

    for filter in [ResampleFilter::Lanczos3, ResampleFilter::Triangle] {
        let config = PipelineConfig {
            resample_filter: filter,
            ..Default::default()
        };
        let extractor = TextureExtractor::new(&config);
        let map = DynamicImage::ImageRgb8(generate_contour_map(4000, 3000));

        group.throughput(Throughput::Elements(4000 * 3000));
        group.bench_with_input(
            BenchmarkId::new("4000x3000", format!("{:?}", filter)),
            &map,
            |b, map| b.iter(|| extractor.extract_from_dynamic(black_box(map))),
        );
    }

    group.finish();
}

fn bench_heightmap_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("heightmap_normalize");
    let normalizer = HeightmapNormalizer::new(&PipelineConfig::default());

    for (w, h) in [(300, 900), (1024, 1024), (2048, 1536)] {
        let elevation = DynamicImage::ImageLuma8(generate_elevation(w, h));
        group.throughput(Throughput::Elements((w * h) as u64));
        group.bench_with_input(
            BenchmarkId::new("normalize", format!("{}x{}", w, h)),
            &elevation,
            |b, img| b.iter(|| normalizer.normalize(black_box(img))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_texture_extract, bench_heightmap_normalize);
criterion_main!(benches);
