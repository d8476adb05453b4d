//! Benchmarks for PCD and PTX encoding and decoding of image-shaped frames

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array3;
use rgbdcloud_io::{
    ExtraFields, PcdReadOptions, PcdReader, PcdWriteOptions, PcdWriter, PtxReadOptions, PtxReader, PtxWriteOptions,
    PtxWriter,
};
use tempfile::NamedTempFile;

/// Generate a synthetic frame of `height × width` points
fn generate_frame(height: usize, width: usize) -> (Array3<f32>, Array3<u8>) {
    let points = Array3::from_shape_fn((height, width, 3), |(i, j, c)| {
        let t = (i * width + j) as f32;
        match c {
            0 => (t * 0.1).sin(),
            1 => (t * 0.1).cos(),
            _ => t * 0.001,
        }
    });
    let colors = Array3::from_shape_fn((height, width, 3), |(i, j, c)| ((i + j * 3 + c * 7) % 256) as u8);
    (points, colors)
}

fn benchmark_pcd_writing(c: &mut Criterion) {
    let sizes = vec![(120, 160), (240, 320), (480, 640)];
    let mut group = c.benchmark_group("pcd_writing");

    for (height, width) in sizes {
        let (points, colors) = generate_frame(height, width);
        let extra = ExtraFields::new();
        group.throughput(Throughput::Elements((height * width) as u64));

        for (name, options) in [("binary", PcdWriteOptions::binary()), ("ascii", PcdWriteOptions::ascii())] {
            group.bench_with_input(BenchmarkId::new(name, height * width), &options, |b, options| {
                b.iter(|| {
                    let mut out = Vec::new();
                    PcdWriter::encode(&mut out, points.view(), colors.view(), &extra, options)
                        .expect("Failed to encode PCD");
                    black_box(out);
                });
            });
        }
    }

    group.finish();
}

fn benchmark_pcd_reading(c: &mut Criterion) {
    let sizes = vec![(120, 160), (240, 320), (480, 640)];
    let mut group = c.benchmark_group("pcd_reading");

    for (height, width) in sizes {
        let (points, colors) = generate_frame(height, width);
        for (name, options) in [("binary", PcdWriteOptions::binary()), ("ascii", PcdWriteOptions::ascii())] {
            let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
            PcdWriter::write(temp_file.path(), points.view(), colors.view(), &ExtraFields::new(), &options)
                .expect("Failed to write PCD file");
            let file_size = std::fs::metadata(temp_file.path())
                .expect("Failed to get file metadata")
                .len();
            group.throughput(Throughput::Bytes(file_size));

            group.bench_with_input(BenchmarkId::new(name, height * width), &temp_file, |b, file| {
                b.iter(|| {
                    let cloud = PcdReader::read(file.path(), &PcdReadOptions::default())
                        .expect("Failed to read PCD file");
                    black_box(cloud);
                });
            });
        }
    }

    group.finish();
}

fn benchmark_ptx_round_trip(c: &mut Criterion) {
    let sizes = vec![(120, 160), (240, 320)];
    let mut group = c.benchmark_group("ptx");

    for (height, width) in sizes {
        let (points, colors) = generate_frame(height, width);
        let options = PtxWriteOptions::default();
        group.throughput(Throughput::Elements((height * width) as u64));

        group.bench_with_input(BenchmarkId::new("encode", height * width), &height, |b, _| {
            b.iter(|| {
                let mut out = Vec::new();
                PtxWriter::encode(&mut out, points.view(), Some(colors.view()), &options)
                    .expect("Failed to encode PTX");
                black_box(out);
            });
        });

        let mut encoded = Vec::new();
        PtxWriter::encode(&mut encoded, points.view(), Some(colors.view()), &options).expect("Failed to encode PTX");
        group.bench_with_input(BenchmarkId::new("decode", height * width), &encoded, |b, encoded| {
            b.iter(|| {
                let mut reader = encoded.as_slice();
                let cloud = PtxReader::decode(&mut reader, &PtxReadOptions::default()).expect("Failed to decode PTX");
                black_box(cloud);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_pcd_writing, benchmark_pcd_reading, benchmark_ptx_round_trip);
criterion_main!(benches);
