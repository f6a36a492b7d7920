//! Scalar solid-colour blending for 8-bit RGBA pixels.
//!
//! Straight (non-premultiplied) source-over: each channel moves towards the
//! colour by `color.a * cover / 255`, and the destination alpha towards 255
//! by the same amount.

use crate::renderer::Blender;

/// 8-bit RGBA pixel, straight alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);
}

/// `a * b / 255`, rounded.
#[inline]
pub fn multiply(a: u8, b: u8) -> u8 {
    let t = a as u32 * b as u32 + 128;
    (((t >> 8) + t) >> 8) as u8
}

/// Interpolate from `p` to `q` by `a / 255`, rounded.
#[inline]
pub fn lerp(p: u8, q: u8, a: u8) -> u8 {
    let t = (q as i32 - p as i32) * a as i32 + 128 - (p > q) as i32;
    (p as i32 + (((t >> 8) + t) >> 8)) as u8
}

/// Paints every run in one colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidBlender {
    color: Rgba8,
}

impl SolidBlender {
    pub fn new(color: Rgba8) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Rgba8 {
        self.color
    }

    #[inline]
    fn blend_pixel(&self, p: &mut Rgba8, cover: u8) {
        let alpha = multiply(self.color.a, cover);
        if alpha == 255 {
            *p = Rgba8::opaque(self.color.r, self.color.g, self.color.b);
        } else if alpha != 0 {
            p.r = lerp(p.r, self.color.r, alpha);
            p.g = lerp(p.g, self.color.g, alpha);
            p.b = lerp(p.b, self.color.b, alpha);
            p.a = lerp(p.a, 255, alpha);
        }
    }
}

impl Blender<Rgba8> for SolidBlender {
    fn fill(&self, pixels: &mut [Rgba8], _x: i32, _y: i32, cover: u8) {
        for p in pixels {
            self.blend_pixel(p, cover);
        }
    }

    fn blend(&self, pixels: &mut [Rgba8], _x: i32, _y: i32, covers: &[u8]) {
        for (p, &cover) in pixels.iter_mut().zip(covers) {
            self.blend_pixel(p, cover);
        }
    }
}
