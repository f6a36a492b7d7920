//! End-to-end checks: path → stroke → rasterizer → mask → renderer.

use agge::alpha::{AlphaFn, EvenOddAlpha, NonZeroAlpha};
use agge::basics::{collect_vertices, is_vertex, RectI, VertexSource};
use agge::blenders::{Rgba8, SolidBlender};
use agge::conv_stroke::ConvStroke;
use agge::conv_transform::ConvTransform;
use agge::ellipse::Ellipse;
use agge::mask::Mask;
use agge::math_stroke::{LineCap, LineJoin};
use agge::path_storage::PathStorage;
use agge::rasterizer_scanline_aa::RasterizerScanlineAa;
use agge::renderer::{Blender, Renderer};
use agge::renderer_parallel::ParallelRenderer;
use agge::rendering_buffer::RenderingBuffer;
use agge::trans_affine::TransAffine;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::cell::Cell;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Stores coverage as-is into an 8-bit buffer.
#[derive(Default)]
struct CoverageBlender {
    calls: Cell<usize>,
}

impl Blender<u8> for CoverageBlender {
    fn fill(&self, pixels: &mut [u8], _x: i32, _y: i32, cover: u8) {
        self.calls.set(self.calls.get() + 1);
        pixels.fill(cover);
    }

    fn blend(&self, pixels: &mut [u8], _x: i32, _y: i32, covers: &[u8]) {
        self.calls.set(self.calls.get() + 1);
        pixels.copy_from_slice(covers);
    }
}

/// Thread-safe variant for the parallel renderer.
struct Store;

impl Blender<u8> for Store {
    fn fill(&self, pixels: &mut [u8], _x: i32, _y: i32, cover: u8) {
        pixels.fill(cover);
    }

    fn blend(&self, pixels: &mut [u8], _x: i32, _y: i32, covers: &[u8]) {
        pixels.copy_from_slice(covers);
    }
}

fn rasterize<VS: VertexSource + ?Sized>(vs: &mut VS) -> RasterizerScanlineAa {
    let mut ras = RasterizerScanlineAa::new();
    ras.add_path(vs, 0).unwrap();
    ras.prepare();
    ras
}

fn render_coverage<A>(ras: &RasterizerScanlineAa, w: u32, h: u32, alpha: &A) -> Vec<u8>
where
    A: AlphaFn,
{
    let mut data = vec![0u8; (w * h) as usize];
    let mut buf = RenderingBuffer::packed(&mut data, w, h).unwrap();
    Renderer::new()
        .render(&mut buf, None, &ras.mask().unwrap(), &Store, alpha)
        .unwrap();
    data
}

fn polygon(points: &[(f64, f64)]) -> PathStorage {
    let mut path = PathStorage::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(x, y);
        } else {
            path.line_to(x, y);
        }
    }
    path.close_polygon();
    path
}

fn shoelace(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        sum += x1 * y2 - x2 * y1;
    }
    (sum / 2.0).abs()
}

/// Total alpha must match the covered area. Alpha is `255 * area` rounded
/// to nearest, so each edge pixel is off by at most half a unit.
fn assert_conserves_area(coverage: &[u8], area: f64) {
    let sum: u64 = coverage.iter().map(|&c| c as u64).sum();
    let partial = coverage.iter().filter(|&&c| c != 0 && c != 255).count() as f64;
    let expected = area * 255.0;
    assert!(
        (sum as f64 - expected).abs() <= partial + 8.0,
        "sum = {}, expected = {}, partial pixels = {}",
        sum,
        expected,
        partial
    );
}

#[test]
fn test_coverage_conservation() {
    init_logger();
    // Vertices on the 1/256 grid so only truncation contributes error.
    let shapes: [&[(f64, f64)]; 3] = [
        &[(2.25, 1.75), (10.625, 1.75), (10.625, 8.125), (2.25, 8.125)],
        &[(3.0, 2.5), (17.75, 6.25), (6.5, 14.0)],
        &[(1.0, 1.0), (18.0, 3.5), (15.25, 17.0), (8.5, 9.75), (2.0, 15.5)],
    ];
    for points in shapes {
        let ras = rasterize(&mut polygon(points));
        let coverage = render_coverage(&ras, 20, 20, &NonZeroAlpha);
        assert_conserves_area(&coverage, shoelace(points));
    }
}

/// Keeps the part of `points` on the `inside` side of the line `y = edge`.
fn clip_at_y(points: &[(f64, f64)], edge: f64, inside: impl Fn(f64) -> bool) -> Vec<(f64, f64)> {
    let cross = |(x1, y1): (f64, f64), (x2, y2): (f64, f64)| {
        let t = (edge - y1) / (y2 - y1);
        (x1 + t * (x2 - x1), edge)
    };
    let n = points.len();
    let mut out = Vec::with_capacity(n + 2);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        match (inside(prev.1), inside(cur.1)) {
            (true, true) => out.push(cur),
            (false, true) => {
                out.push(cross(prev, cur));
                out.push(cur);
            }
            (true, false) => out.push(cross(prev, cur)),
            (false, false) => {}
        }
    }
    out
}

/// Exact area of `points` between rows `y` and `y + 1`.
fn row_area(points: &[(f64, f64)], y: i32) -> f64 {
    let (top, bottom) = (y as f64, y as f64 + 1.0);
    let band = clip_at_y(points, top, |py| py >= top);
    let band = clip_at_y(&band, bottom, |py| py <= bottom);
    if band.len() < 3 {
        0.0
    } else {
        shoelace(&band)
    }
}

#[test]
fn test_row_coverage_matches_row_area() {
    let triangle = [(3.0, 2.5), (37.75, 6.25), (6.5, 34.0)];
    let (w, h) = (40u32, 36u32);
    let ras = rasterize(&mut polygon(&triangle));
    let mask = ras.mask().unwrap();
    let coverage = render_coverage(&ras, w, h, &NonZeroAlpha);

    for y in 0..h as i32 {
        let row = &coverage[(y as u32 * w) as usize..((y as u32 + 1) * w) as usize];
        let sum: f64 = row.iter().map(|&c| c as f64).sum();
        let expected = row_area(&triangle, y) * 255.0;
        // Spans between cells are exact; every cell pixel rounds once.
        let cells = mask.cells(y).map_or(0, |cells| cells.len()) as f64;
        assert!(
            (sum - expected).abs() <= 0.5 * cells + 1.0,
            "row {}: sum = {}, expected = {}, cells = {}",
            y,
            sum,
            expected,
            cells
        );
    }
}

#[test]
fn test_winding_direction_does_not_matter() {
    let cw = [(1.5, 1.25), (9.0, 2.0), (7.75, 8.5)];
    let ccw = [(7.75, 8.5), (9.0, 2.0), (1.5, 1.25)];
    let a = render_coverage(&rasterize(&mut polygon(&cw)), 12, 12, &NonZeroAlpha);
    let b = render_coverage(&rasterize(&mut polygon(&ccw)), 12, 12, &NonZeroAlpha);
    assert_eq!(a, b);
}

#[test]
fn test_reset_is_idempotent() {
    let mut first = Ellipse::new(20.0, 15.0, 12.0, 9.0, 0, false);
    let mut other = polygon(&[(0.0, 0.0), (30.0, 2.0), (4.0, 28.0)]);

    let mut ras = RasterizerScanlineAa::new();
    ras.add_path(&mut first, 0).unwrap();
    ras.prepare();
    let fresh = render_coverage(&ras, 40, 30, &NonZeroAlpha);

    ras.reset();
    ras.add_path(&mut other, 0).unwrap();
    ras.prepare();
    ras.reset();
    ras.reset();
    ras.add_path(&mut first, 0).unwrap();
    ras.prepare();
    ras.prepare();
    assert_eq!(render_coverage(&ras, 40, 30, &NonZeroAlpha), fresh);
}

#[test]
fn test_rows_are_sorted_and_bounded() {
    let star = [(3.2, 1.1), (40.7, 12.3), (12.9, 33.6), (25.1, 4.4), (1.3, 20.8)];
    let mut path = polygon(&star);
    let ras = rasterize(&mut path);
    let mask = ras.mask().unwrap();
    let mut sl = agge::scanline_u::ScanlineU8::new();
    for y in mask.rows() {
        let cells = mask.cells(y).unwrap();
        assert!(cells.windows(2).all(|w| w[0].x < w[1].x), "row {}", y);
        assert!(cells.iter().all(|c| c.x >= mask.min_x() && c.x <= mask.max_x()));

        let mut next_x = i32::MIN;
        for run in mask.row(y, &EvenOddAlpha, &mut sl).unwrap() {
            assert!(run.x >= next_x, "overlapping runs in row {}", y);
            assert!(run.len > 0);
            next_x = run.x + run.len as i32;
        }
    }
    assert!(mask.cells(mask.min_y() - 1).is_err());
    assert!(mask.cells(mask.min_y() + mask.height() as i32).is_err());
}

#[test]
fn test_stroke_width_invariant() {
    // Axis-aligned: exact rectangle of L x W.
    let mut line = PathStorage::new();
    line.move_to(10.0, 20.0);
    line.line_to(50.0, 20.0);
    let mut stroke = ConvStroke::new(line);
    stroke.set_width(8.0);
    stroke.set_line_cap(LineCap::Butt);

    let vertices = collect_vertices(&mut stroke, 0);
    let (mut x1, mut y1, mut x2, mut y2) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for v in vertices.iter().filter(|v| is_vertex(v.cmd)) {
        x1 = x1.min(v.x);
        y1 = y1.min(v.y);
        x2 = x2.max(v.x);
        y2 = y2.max(v.y);
    }
    assert!((x1 - 10.0).abs() < 1e-9 && (x2 - 50.0).abs() < 1e-9);
    assert!((y1 - 16.0).abs() < 1e-9 && (y2 - 24.0).abs() < 1e-9);

    let coverage = render_coverage(&rasterize(&mut stroke), 64, 32, &NonZeroAlpha);
    assert_conserves_area(&coverage, 40.0 * 8.0);

    // Diagonal 3-4-5 segment of length 50.
    let mut line = PathStorage::new();
    line.move_to(10.0, 10.0);
    line.line_to(40.0, 50.0);
    let mut stroke = ConvStroke::new(line);
    stroke.set_width(6.0);
    let coverage = render_coverage(&rasterize(&mut stroke), 64, 64, &NonZeroAlpha);
    let sum: f64 = coverage.iter().map(|&c| c as f64).sum();
    let expected = 50.0 * 6.0 * 255.0;
    // Outline vertices are off the subpixel grid here.
    assert!((sum - expected).abs() / expected < 0.01, "sum = {}", sum);
}

#[test]
fn test_miter_fallback_equals_bevel() {
    let outline = |join: LineJoin| {
        let mut path = PathStorage::new();
        path.move_to(10.0, 50.0);
        path.line_to(60.0, 52.0);
        path.line_to(10.0, 54.0);
        let mut stroke = ConvStroke::new(path);
        stroke.set_width(10.0);
        stroke.set_miter_limit(4.0);
        stroke.set_line_join(join);
        collect_vertices(&mut stroke, 0)
    };
    let miter = outline(LineJoin::Miter);
    let bevel = outline(LineJoin::Bevel);
    assert_eq!(miter, bevel);
    // No spike beyond the turning vertex plus half the width.
    assert!(miter.iter().all(|v| v.x <= 60.0 + 5.0));
}

#[test]
fn test_miter_within_limit_extends() {
    let mut path = PathStorage::new();
    path.move_to(10.0, 10.0);
    path.line_to(40.0, 10.0);
    path.line_to(40.0, 40.0);
    let mut stroke = ConvStroke::new(path);
    stroke.set_width(10.0);
    stroke.set_line_join(LineJoin::Miter);
    let ras = rasterize(&mut stroke);
    // The square corner (44, 6) is inside the miter but outside a bevel.
    assert!(ras.hit_test(44, 5, &NonZeroAlpha).unwrap());
    assert!(!ras.hit_test(46, 5, &NonZeroAlpha).unwrap());
}

#[test]
fn test_empty_input() {
    init_logger();
    let blender = CoverageBlender::default();
    let mut data = vec![0u8; 16 * 16];

    let mut ras = RasterizerScanlineAa::new();
    ras.prepare();
    let mask = ras.mask().unwrap();
    assert_eq!(mask.height(), 0);
    let mut buf = RenderingBuffer::packed(&mut data, 16, 16).unwrap();
    Renderer::new()
        .render(&mut buf, None, &mask, &blender, &NonZeroAlpha)
        .unwrap();
    assert_eq!(blender.calls.get(), 0);

    // A lone point strokes to nothing.
    let mut dot = PathStorage::new();
    dot.move_to(5.0, 5.0);
    let ras = rasterize(&mut ConvStroke::new(dot));
    assert_eq!(ras.mask().unwrap().height(), 0);

    // Zero-area polygon leaves no covered pixel.
    let ras = rasterize(&mut polygon(&[(1.0, 1.0), (9.0, 9.0), (1.0, 1.0)]));
    assert!(render_coverage(&ras, 16, 16, &NonZeroAlpha).iter().all(|&c| c == 0));
}

#[test]
fn test_stroke_sandbox_scene() {
    init_logger();
    let mut path = PathStorage::new();
    path.move_to(140.0, 65.0);
    path.line_to(180.0, 70.0);
    path.line_to(160.0, 75.0);
    let mut stroke = ConvStroke::new(path);
    stroke.set_width(31.0);
    stroke.set_miter_limit(10.0);
    stroke.set_line_join(LineJoin::Miter);
    stroke.set_line_cap(LineCap::Butt);

    let ras = rasterize(&mut stroke);
    let mask = ras.mask().unwrap();
    assert!(mask.min_y() <= 50);
    assert!(mask.min_y() + mask.height() as i32 >= 90);
    // The miter tip reaches well past the turning vertex.
    assert!(mask.max_x() > 230);

    let (w, h) = (320u32, 120u32);
    let mut pixels = vec![Rgba8::opaque(255, 255, 255); (w * h) as usize];
    let mut buf = RenderingBuffer::packed(&mut pixels, w, h).unwrap();
    let blender = SolidBlender::new(Rgba8::opaque(0, 0, 0));
    Renderer::new()
        .render(&mut buf, None, &mask, &blender, &NonZeroAlpha)
        .unwrap();

    let at = |x: u32, y: u32| pixels[(y * w + x) as usize];
    assert_eq!(at(145, 66), Rgba8::opaque(0, 0, 0));
    assert_eq!(at(150, 67), Rgba8::opaque(0, 0, 0));
    assert_eq!(at(20, 20), Rgba8::opaque(255, 255, 255));
    // The butt cap edge cuts through the start pixel.
    let edge = mask.coverage(140, 64, &NonZeroAlpha);
    assert!(edge > 0 && edge < 255, "edge = {}", edge);
    assert_ne!(at(140, 64), Rgba8::opaque(0, 0, 0));
    assert_ne!(at(140, 64), Rgba8::opaque(255, 255, 255));
}

#[test]
fn test_tiles_compose_to_full_canvas() {
    let mut shape = Ellipse::new(33.0, 21.0, 25.5, 17.25, 0, true);
    let ras = rasterize(&mut shape);
    let mask = ras.mask().unwrap();
    let (w, h) = (64u32, 48u32);
    let full = render_coverage(&ras, w, h, &NonZeroAlpha);

    let mut tiled = vec![0u8; (w * h) as usize];
    let mut renderer = Renderer::new();
    for ty in (0..h).step_by(20) {
        for tx in (0..w).step_by(24) {
            let window = RectI::new(tx as i32, ty as i32, (tx + 24) as i32, (ty + 20) as i32);
            let mut tile = vec![0u8; 24 * 20];
            let mut buf = RenderingBuffer::packed(&mut tile, 24, 20).unwrap();
            renderer
                .render(&mut buf, Some(&window), &mask, &Store, &NonZeroAlpha)
                .unwrap();
            for y in ty..(ty + 20).min(h) {
                for x in tx..(tx + 24).min(w) {
                    tiled[(y * w + x) as usize] = tile[((y - ty) * 24 + x - tx) as usize];
                }
            }
        }
    }
    assert_eq!(tiled, full);
}

#[test]
fn test_boxed_source_with_transform() {
    let rect = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
    let source: Box<dyn VertexSource> = Box::new(rect);
    let mtx = TransAffine::scaling(2.0, 3.0) * TransAffine::translation(1.0, 1.0);
    let scaled = ConvTransform::new(source, mtx);
    let mut boxed: Box<dyn VertexSource> = Box::new(scaled);
    let ras = rasterize(&mut boxed);
    let coverage = render_coverage(&ras, 12, 10, &NonZeroAlpha);
    for y in 0..10 {
        for x in 0..12 {
            let inside = (1..9).contains(&x) && (1..7).contains(&y);
            assert_eq!(coverage[y * 12 + x], if inside { 255 } else { 0 }, "({}, {})", x, y);
        }
    }

    let triangle = polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]);
    let mut shifted = ConvTransform::new(triangle, |x: f64, y: f64| (x + 5.0, y));
    let ras = rasterize(&mut shifted);
    assert!(ras.hit_test(6, 0, &NonZeroAlpha).unwrap());
    assert!(!ras.hit_test(0, 0, &NonZeroAlpha).unwrap());
}

#[test]
fn test_even_odd_hole() {
    let mut path = polygon(&[(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)]);
    let mut inner = polygon(&[(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)]);
    path.concat_path(&mut inner, 0);
    let ras = rasterize(&mut path);
    assert!(ras.hit_test(10, 10, &NonZeroAlpha).unwrap());
    assert!(!ras.hit_test(10, 10, &EvenOddAlpha).unwrap());
    assert!(ras.hit_test(2, 10, &EvenOddAlpha).unwrap());
    // Custom alpha: anything covered at all becomes opaque.
    let binary = |raw: i32| -> u8 {
        if raw != 0 {
            255
        } else {
            0
        }
    };
    let coverage = render_coverage(&ras, 20, 20, &binary);
    assert!(coverage.iter().all(|&c| c == 255));
}

#[quickcheck]
fn parallel_matches_sequential(
    cx: u8,
    cy: u8,
    rx: u8,
    ry: u8,
    threads: u8,
    band: u8,
    window: bool,
) -> TestResult {
    if rx == 0 || ry == 0 || threads == 0 || threads > 8 {
        return TestResult::discard();
    }
    let (w, h) = (72u32, 56u32);
    let mut shape = Ellipse::new(
        cx as f64 / 3.0,
        cy as f64 / 4.0,
        rx as f64 / 6.0,
        ry as f64 / 8.0,
        0,
        false,
    );
    let ras = rasterize(&mut shape);
    let mask = ras.mask().unwrap();
    let window_rect = RectI::new(-5, 7, 80, 70);
    let window = if window { Some(&window_rect) } else { None };

    let mut expected = vec![0u8; (w * h) as usize];
    let mut buf = RenderingBuffer::packed(&mut expected, w, h).unwrap();
    Renderer::new()
        .render(&mut buf, window, &mask, &Store, &EvenOddAlpha)
        .unwrap();

    let par = ParallelRenderer::new(threads as usize)
        .unwrap()
        .with_band_height(band as u32);
    let mut actual = vec![0u8; (w * h) as usize];
    let mut buf = RenderingBuffer::packed(&mut actual, w, h).unwrap();
    par.render(&mut buf, window, &mask, &Store, &EvenOddAlpha)
        .unwrap();

    TestResult::from_bool(actual == expected)
}
