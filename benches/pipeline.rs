use agge::alpha::NonZeroAlpha;
use agge::blenders::{Rgba8, SolidBlender};
use agge::conv_stroke::ConvStroke;
use agge::ellipse::Ellipse;
use agge::math_stroke::LineJoin;
use agge::path_storage::PathStorage;
use agge::rasterizer_scanline_aa::RasterizerScanlineAa;
use agge::renderer::Renderer;
use agge::renderer_parallel::ParallelRenderer;
use agge::rendering_buffer::RenderingBuffer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

struct Xorshift32(u32);

impl Iterator for Xorshift32 {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        Some(self.0)
    }
}

/// A zig-zag polyline across the canvas.
fn polyline(points: usize) -> PathStorage {
    let mut rng = Xorshift32(42);
    let mut path = PathStorage::new();
    for i in 0..points {
        let x = (rng.next().unwrap_or(0) % WIDTH) as f64;
        let y = (rng.next().unwrap_or(0) % HEIGHT) as f64;
        if i == 0 {
            path.move_to(x, y);
        } else {
            path.line_to(x, y);
        }
    }
    path
}

fn scene() -> RasterizerScanlineAa {
    let mut stroke = ConvStroke::new(polyline(64));
    stroke.set_width(12.0);
    stroke.set_line_join(LineJoin::Round);
    let mut ras = RasterizerScanlineAa::new();
    ras.add_path(&mut stroke, 0).unwrap();
    ras.add_path(&mut Ellipse::new(512.0, 384.0, 300.0, 250.0, 0, false), 0)
        .unwrap();
    ras.prepare();
    ras
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stroke");
    for &points in &[16usize, 256] {
        group.bench_function(BenchmarkId::new("polyline", points), |b| {
            let mut stroke = ConvStroke::new(polyline(points));
            stroke.set_width(7.5);
            b.iter(|| black_box(agge::basics::collect_vertices(&mut stroke, 0).len()));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("rasterize");
    group.bench_function("scene", |b| {
        let mut stroke = ConvStroke::new(polyline(64));
        stroke.set_width(12.0);
        let mut ras = RasterizerScanlineAa::new();
        b.iter(|| {
            ras.reset();
            ras.add_path(&mut stroke, 0).unwrap();
            ras.prepare();
            black_box(ras.mask().unwrap().total_cells())
        });
    });
    group.finish();

    let ras = scene();
    let mask = ras.mask().unwrap();
    let blender = SolidBlender::new(Rgba8::new(20, 60, 200, 180));
    let mut pixels = vec![Rgba8::opaque(255, 255, 255); (WIDTH * HEIGHT) as usize];

    let mut group = c.benchmark_group("render");
    group.bench_function("sequential", |b| {
        let mut renderer = Renderer::new();
        b.iter(|| {
            let mut buf = RenderingBuffer::packed(&mut pixels, WIDTH, HEIGHT).unwrap();
            renderer
                .render(&mut buf, None, &mask, &blender, &NonZeroAlpha)
                .unwrap();
        });
    });
    for &threads in &[2usize, 4, 8] {
        group.bench_function(BenchmarkId::new("parallel", threads), |b| {
            let renderer = ParallelRenderer::new(threads).unwrap();
            b.iter(|| {
                let mut buf = RenderingBuffer::packed(&mut pixels, WIDTH, HEIGHT).unwrap();
                renderer
                    .render(&mut buf, None, &mask, &blender, &NonZeroAlpha)
                    .unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
