//! Mask compositing.
//!
//! Drives mask rows through a [`Blender`] into a [`RenderingBuffer`]. The
//! buffer may stand for any window of the canvas: canvas pixel `(x, y)`
//! lands at buffer pixel `(x - window.x1, y - window.y1)`, and only the
//! part of the mask inside both the window and the buffer is touched.

use crate::alpha::AlphaFn;
use crate::basics::RectI;
use crate::error::Result;
use crate::mask::Mask;
use crate::rendering_buffer::RenderingBuffer;
use crate::scanline_u::{Coverage, Runs, ScanlineU8};

/// Applies coverage to destination pixels.
///
/// `pixels` is the destination row already sliced at `x` and holds exactly
/// as many pixels as the run (never zero). `x` and `y` are canvas
/// coordinates of the first pixel.
pub trait Blender<P> {
    /// Blend a run of constant coverage.
    fn fill(&self, pixels: &mut [P], x: i32, y: i32, cover: u8);

    /// Blend a run with one coverage value per pixel; `covers.len() == pixels.len()`.
    fn blend(&self, pixels: &mut [P], x: i32, y: i32, covers: &[u8]);
}

impl<P, B: Blender<P> + ?Sized> Blender<P> for &B {
    fn fill(&self, pixels: &mut [P], x: i32, y: i32, cover: u8) {
        (**self).fill(pixels, x, y, cover);
    }

    fn blend(&self, pixels: &mut [P], x: i32, y: i32, covers: &[u8]) {
        (**self).blend(pixels, x, y, covers);
    }
}

/// Placement of a buffer on the canvas, clipped against a mask.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Viewport {
    /// Canvas position of buffer pixel (0, 0).
    origin_x: i64,
    origin_y: i64,
    /// Visible canvas columns, half-open.
    x1: i64,
    x2: i64,
    /// Visible canvas rows that the mask covers, half-open.
    pub(crate) y1: i64,
    pub(crate) y2: i64,
}

impl Viewport {
    pub(crate) fn new<M: Mask + ?Sized>(
        width: u32,
        height: u32,
        window: Option<&RectI>,
        mask: &M,
    ) -> Self {
        let (origin_x, origin_y) = window.map_or((0, 0), |w| (w.x1 as i64, w.y1 as i64));
        let (width, height) = match window {
            Some(w) if w.is_empty() => (0, 0),
            Some(w) => (w.width().min(width as i64), w.height().min(height as i64)),
            None => (width as i64, height as i64),
        };
        let x2 = origin_x + width;
        let y2 = origin_y + height;
        let mask_y1 = mask.min_y() as i64;
        let mask_y2 = mask_y1 + mask.height() as i64;
        Self {
            origin_x,
            origin_y,
            x1: origin_x.max(mask.min_x() as i64),
            x2: x2.min(mask.max_x() as i64 + 1),
            y1: origin_y.max(mask_y1),
            y2: y2.min(mask_y2),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    /// Buffer row index of canvas row `y`.
    pub(crate) fn buffer_row(&self, y: i64) -> usize {
        (y - self.origin_y) as usize
    }

    /// Sweep canvas row `y` of `mask` and blend it into `row`, the matching
    /// buffer row.
    pub(crate) fn render_row<P, M, B, A>(
        &self,
        row: &mut [P],
        y: i32,
        mask: &M,
        blender: &B,
        alpha: &A,
        sl: &mut ScanlineU8,
    ) -> Result<()>
    where
        M: Mask + ?Sized,
        B: Blender<P> + ?Sized,
        A: AlphaFn + ?Sized,
    {
        let runs = mask.row(y, alpha, sl)?;
        self.blend_runs(row, y, runs, blender);
        Ok(())
    }

    fn blend_runs<P, B>(&self, row: &mut [P], y: i32, runs: Runs<'_>, blender: &B)
    where
        B: Blender<P> + ?Sized,
    {
        for run in runs {
            let run_x1 = run.x as i64;
            let x1 = run_x1.max(self.x1);
            let x2 = (run_x1 + run.len as i64).min(self.x2);
            if x1 >= x2 {
                continue;
            }
            let b1 = (x1 - self.origin_x) as usize;
            let b2 = (x2 - self.origin_x) as usize;
            let pixels = &mut row[b1..b2];
            match run.coverage {
                Coverage::Solid(cover) => blender.fill(pixels, x1 as i32, y, cover),
                Coverage::PerPixel(covers) => {
                    let c1 = (x1 - run_x1) as usize;
                    let c2 = (x2 - run_x1) as usize;
                    blender.blend(pixels, x1 as i32, y, &covers[c1..c2]);
                }
            }
        }
    }
}

/// Sequential renderer. Owns the scanline scratch reused across rows and
/// calls.
#[derive(Debug, Default)]
pub struct Renderer {
    sl: ScanlineU8,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite `mask` into `buffer`.
    ///
    /// `window` is the canvas rectangle `[x1, x2) x [y1, y2)` the buffer
    /// represents; `None` puts the buffer origin at the canvas origin.
    pub fn render<P, M, B, A>(
        &mut self,
        buffer: &mut RenderingBuffer<'_, P>,
        window: Option<&RectI>,
        mask: &M,
        blender: &B,
        alpha: &A,
    ) -> Result<()>
    where
        M: Mask + ?Sized,
        B: Blender<P> + ?Sized,
        A: AlphaFn + ?Sized,
    {
        let view = Viewport::new(buffer.width(), buffer.height(), window, mask);
        if view.is_empty() {
            return Ok(());
        }
        for y in view.y1..view.y2 {
            let row = buffer.row_mut(view.buffer_row(y) as u32);
            view.render_row(row, y as i32, mask, blender, alpha, &mut self.sl)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha::NonZeroAlpha;
    use crate::rasterizer_scanline_aa::RasterizerScanlineAa;
    use std::cell::RefCell;

    /// Writes coverage straight into a `u8` buffer and records every call.
    #[derive(Default)]
    struct CoverageBlender {
        calls: RefCell<Vec<(i32, i32, usize)>>,
    }

    impl Blender<u8> for CoverageBlender {
        fn fill(&self, pixels: &mut [u8], x: i32, y: i32, cover: u8) {
            self.calls.borrow_mut().push((x, y, pixels.len()));
            pixels.fill(cover);
        }

        fn blend(&self, pixels: &mut [u8], x: i32, y: i32, covers: &[u8]) {
            assert_eq!(pixels.len(), covers.len());
            self.calls.borrow_mut().push((x, y, pixels.len()));
            pixels.copy_from_slice(covers);
        }
    }

    fn rect_rasterizer(x1: f64, y1: f64, x2: f64, y2: f64) -> RasterizerScanlineAa {
        let mut ras = RasterizerScanlineAa::new();
        ras.move_to_d(x1, y1).unwrap();
        ras.line_to_d(x2, y1).unwrap();
        ras.line_to_d(x2, y2).unwrap();
        ras.line_to_d(x1, y2).unwrap();
        ras.prepare();
        ras
    }

    #[test]
    fn test_render_without_window() {
        let ras = rect_rasterizer(1.5, 1.0, 4.0, 3.0);
        let mut data = vec![0u8; 6 * 4];
        let mut buf = RenderingBuffer::packed(&mut data, 6, 4).unwrap();
        let blender = CoverageBlender::default();
        Renderer::new()
            .render(&mut buf, None, &ras.mask().unwrap(), &blender, &NonZeroAlpha)
            .unwrap();
        #[rustfmt::skip]
        let expected = vec![
            0, 0,   0,   0,   0, 0,
            0, 128, 255, 255, 0, 0,
            0, 128, 255, 255, 0, 0,
            0, 0,   0,   0,   0, 0,
        ];
        assert_eq!(data, expected);
        assert_eq!(blender.calls.borrow().len(), 4);
    }

    #[test]
    fn test_render_with_window_clips_and_offsets() {
        let ras = rect_rasterizer(0.0, 0.0, 10.0, 10.0);
        let mask = ras.mask().unwrap();
        let mut data = vec![0u8; 3 * 2];
        let mut buf = RenderingBuffer::packed(&mut data, 3, 2).unwrap();
        let window = RectI::new(8, 9, 20, 20);
        let blender = CoverageBlender::default();
        Renderer::new()
            .render(&mut buf, Some(&window), &mask, &blender, &NonZeroAlpha)
            .unwrap();
        // Canvas columns 8..10 and row 9 are inside the rectangle.
        assert_eq!(data, vec![255, 255, 0, 0, 0, 0]);
        assert_eq!(*blender.calls.borrow(), vec![(8, 9, 2)]);
    }

    #[test]
    fn test_window_narrower_than_buffer() {
        let ras = rect_rasterizer(0.0, 0.0, 10.0, 10.0);
        let mut data = vec![0u8; 4 * 4];
        let mut buf = RenderingBuffer::packed(&mut data, 4, 4).unwrap();
        let window = RectI::new(2, 2, 4, 3);
        Renderer::new()
            .render(
                &mut buf,
                Some(&window),
                &ras.mask().unwrap(),
                &CoverageBlender::default(),
                &NonZeroAlpha,
            )
            .unwrap();
        assert_eq!(&data[..4], &[255, 255, 0, 0]);
        assert!(data[4..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_per_pixel_runs_are_sub_sliced() {
        // Two adjacent partial pixels form one run: [191, 128] at x = 0.
        let ras = rect_rasterizer(0.25, 0.0, 1.5, 1.0);
        let mask = ras.mask().unwrap();
        let render = |window: Option<&RectI>| {
            let mut data = vec![0u8; 1];
            let mut buf = RenderingBuffer::packed(&mut data, 1, 1).unwrap();
            let blender = CoverageBlender::default();
            Renderer::new()
                .render(&mut buf, window, &mask, &blender, &NonZeroAlpha)
                .unwrap();
            let calls = blender.calls.into_inner();
            (data[0], calls)
        };
        assert_eq!(render(None), (191, vec![(0, 0, 1)]));
        assert_eq!(render(Some(&RectI::new(1, 0, 2, 1))), (128, vec![(1, 0, 1)]));
    }

    #[test]
    fn test_inverted_window_makes_no_calls() {
        let ras = rect_rasterizer(0.0, 0.0, 10.0, 10.0);
        let mut data = vec![0u8; 16];
        let mut buf = RenderingBuffer::packed(&mut data, 4, 4).unwrap();
        let blender = CoverageBlender::default();
        let mask = ras.mask().unwrap();
        for window in [RectI::new(5, 1, 2, 9), RectI::new(1, 3, 4, 3)] {
            Renderer::new()
                .render(&mut buf, Some(&window), &mask, &blender, &NonZeroAlpha)
                .unwrap();
        }
        assert!(blender.calls.borrow().is_empty());
        assert!(data.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_empty_mask_makes_no_calls() {
        let mut ras = RasterizerScanlineAa::new();
        ras.prepare();
        let mut data = vec![0u8; 16];
        let mut buf = RenderingBuffer::packed(&mut data, 4, 4).unwrap();
        let blender = CoverageBlender::default();
        Renderer::new()
            .render(&mut buf, None, &ras.mask().unwrap(), &blender, &NonZeroAlpha)
            .unwrap();
        assert!(blender.calls.borrow().is_empty());
    }
}
