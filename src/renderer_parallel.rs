//! Row-parallel compositing.
//!
//! The destination buffer is split into bands of consecutive rows. Each
//! band is handed to exactly one task of a renderer-owned thread pool, so
//! no two tasks ever touch the same pixel, and every task sweeps with its
//! own scanline. The mask, blender and alpha function are shared read-only.
//! Output is identical to [`Renderer`](crate::renderer::Renderer) for any
//! thread count and band height.

use rayon::prelude::*;

use crate::alpha::AlphaFn;
use crate::basics::RectI;
use crate::error::Result;
use crate::mask::Mask;
use crate::renderer::{Blender, Viewport};
use crate::rendering_buffer::RenderingBuffer;
use crate::scanline_u::ScanlineU8;

pub const DEFAULT_BAND_HEIGHT: u32 = 16;

/// Renderer that composites bands of rows on a fixed-size thread pool.
///
/// The pool lives as long as the renderer and is torn down on drop.
pub struct ParallelRenderer {
    pool: rayon::ThreadPool,
    band_height: u32,
}

impl ParallelRenderer {
    /// Create a renderer with `threads` workers; `0` picks one per CPU.
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("agge-render-{}", i))
            .build()?;
        log::debug!(
            "parallel renderer started with {} threads",
            pool.current_num_threads()
        );
        Ok(Self {
            pool,
            band_height: DEFAULT_BAND_HEIGHT,
        })
    }

    /// Rows per band; clamped to at least one.
    pub fn with_band_height(mut self, rows: u32) -> Self {
        self.band_height = rows.max(1);
        self
    }

    pub fn band_height(&self) -> u32 {
        self.band_height
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Composite `mask` into `buffer`. See
    /// [`Renderer::render`](crate::renderer::Renderer::render) for the
    /// meaning of `window`.
    pub fn render<P, M, B, A>(
        &self,
        buffer: &mut RenderingBuffer<'_, P>,
        window: Option<&RectI>,
        mask: &M,
        blender: &B,
        alpha: &A,
    ) -> Result<()>
    where
        P: Send,
        M: Mask + Sync + ?Sized,
        B: Blender<P> + Sync + ?Sized,
        A: AlphaFn + Sync + ?Sized,
    {
        let view = Viewport::new(buffer.width(), buffer.height(), window, mask);
        if view.is_empty() {
            return Ok(());
        }

        let width = buffer.width() as usize;
        let stride = buffer.stride();
        let band = self.band_height as usize;
        let first_row = view.buffer_row(view.y1);
        let rows = (view.y2 - view.y1) as usize;

        // Only the rows the mask reaches take part.
        let pixels = buffer.pixels_mut();
        let end = ((first_row + rows) * stride).min(pixels.len());
        let pixels = &mut pixels[first_row * stride..end];

        log::debug!(
            "rendering {} rows in {} bands of {}",
            rows,
            (rows + band - 1) / band,
            band
        );

        self.pool.install(|| {
            pixels
                .par_chunks_mut(stride * band)
                .enumerate()
                .try_for_each_init(ScanlineU8::new, |sl, (i, chunk)| {
                    let band_y = view.y1 + (i * band) as i64;
                    let band_rows = band.min(rows - i * band);
                    for r in 0..band_rows {
                        let start = r * stride;
                        let row = &mut chunk[start..start + width];
                        let y = band_y + r as i64;
                        view.render_row(row, y as i32, mask, blender, alpha, sl)?;
                    }
                    Ok(())
                })
        })
    }
}
