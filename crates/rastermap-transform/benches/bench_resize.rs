use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rastermap_image::{ImageBuf, ImageSpec, PixelFormat, Roi, WrapMode};
use rastermap_transform::{resize_into, warp_into, M33};

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    let image_sizes = vec![(256, 224), (512, 448), (1024, 896)];

    for (width, height) in image_sizes {
        let id = format!("{}x{}", width, height);
        let data = vec![0.5f32; (width * height * 3) as usize];
        let image =
            ImageBuf::from_data(ImageSpec::new(width, height, 3, PixelFormat::F32), data).unwrap();
        let roi = Roi::new(0, width / 2, 0, height / 2);

        group.bench_with_input(BenchmarkId::new("lanczos3", &id), &image, |b, i| {
            let mut out = ImageBuf::uninitialized();
            b.iter(|| resize_into(black_box(&mut out), black_box(i), "lanczos3", 0.0, roi, 0))
        });
        group.bench_with_input(BenchmarkId::new("triangle", &id), &image, |b, i| {
            let mut out = ImageBuf::uninitialized();
            b.iter(|| resize_into(black_box(&mut out), black_box(i), "triangle", 0.0, roi, 0))
        });
        group.bench_with_input(BenchmarkId::new("warp_rot", &id), &image, |b, i| {
            let m = M33::rotation_about(0.3, width as f32 / 2.0, height as f32 / 2.0);
            let mut out = ImageBuf::uninitialized();
            b.iter(|| {
                warp_into(
                    black_box(&mut out),
                    black_box(i),
                    &m,
                    "lanczos3",
                    0.0,
                    false,
                    WrapMode::Black,
                    Roi::UNDEFINED,
                    0,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resize);
criterion_main!(benches);
