//! Rendering buffer: row-oriented access to caller-owned pixels.
//!
//! The buffer borrows a pixel slice laid out row-major with a stride of
//! at least the row width. The crate never allocates pixel storage.

use crate::error::{Error, Result};
use crate::renderer::Blender;

#[derive(Debug)]
pub struct RenderingBuffer<'a, P> {
    pixels: &'a mut [P],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a, P> RenderingBuffer<'a, P> {
    /// Attach to `pixels`, with `stride` pixels between row starts.
    pub fn new(pixels: &'a mut [P], width: u32, height: u32, stride: usize) -> Result<Self> {
        let w = width as usize;
        if height > 1 && stride < w {
            return Err(Error::InvalidStride { stride, width: w });
        }
        let required = match height {
            0 => 0,
            h => stride.max(w) * (h as usize - 1) + w,
        };
        if pixels.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            stride: stride.max(w),
        })
    }

    /// Attach to a tightly packed buffer (`stride == width`).
    pub fn packed(pixels: &'a mut [P], width: u32, height: u32) -> Result<Self> {
        Self::new(pixels, width, height, width as usize)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row `y`, exactly `width` pixels. Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[P] {
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.width as usize]
    }

    /// Row `y`, exactly `width` pixels. Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [P] {
        let start = y as usize * self.stride;
        &mut self.pixels[start..start + self.width as usize]
    }

    /// The whole underlying slice, including stride padding.
    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut *self.pixels
    }

    /// Set every pixel of every row to `value`.
    pub fn clear(&mut self, value: P)
    where
        P: Clone,
    {
        for y in 0..self.height {
            self.row_mut(y).fill(value.clone());
        }
    }

    /// Blend every row through `blender` at full coverage. Unlike
    /// [`clear`](Self::clear), this honours the blender's compositing, so a
    /// translucent colour tints instead of overwriting.
    pub fn fill_with<B: Blender<P> + ?Sized>(&mut self, blender: &B) {
        if self.width == 0 {
            return;
        }
        for y in 0..self.height {
            blender.fill(self.row_mut(y), 0, y as i32, 255);
        }
    }
}
