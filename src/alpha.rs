//! Alpha functions: mapping accumulated cell coverage to 8-bit alpha.
//!
//! The sweep hands every alpha function a raw value in units of
//! `1 / (2 * 256 * 256)` pixel, signed by winding direction:
//!
//! * for a pixel holding a cell, `raw = (cover << 9) - area`;
//! * for the solid span up to the next cell, `raw = cover << 9`;
//!
//! where `cover` is the running sum of cell covers up to and including the
//! current cell. A fully covered pixel with winding 1 yields `raw = 1 << 17`.
//!
//! Both unit rules scale that range onto `0..=255` with rounding, so partial
//! and solid pixels share one scale and each pixel is off by at most half a
//! unit from `255 * area`.

use crate::basics::{FillingRule, COVER_SHIFT, POLY_SUBPIXEL_SHIFT};

const AREA_SHIFT: u32 = POLY_SUBPIXEL_SHIFT + 1;
/// Bits of `raw` for one full pixel.
const FULL_SHIFT: u32 = POLY_SUBPIXEL_SHIFT * 2 + 1;
const FULL: u64 = 1 << FULL_SHIFT;
const ALPHA_MAX: u64 = (1 << COVER_SHIFT) - 1;

/// Maps a raw accumulated coverage value to alpha in `0..=255`.
///
/// Implemented by [`FillingRule`], by the unit rules [`NonZeroAlpha`] and
/// [`EvenOddAlpha`], and by any `Fn(i32) -> u8`.
pub trait AlphaFn {
    fn alpha(&self, raw: i32) -> u8;
}

/// Non-zero winding: any winding count covers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonZeroAlpha;

/// Even-odd: odd winding counts cover, even ones are holes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenOddAlpha;

/// `round(255 * c / FULL)`, saturating at 255.
#[inline]
fn scale(c: u64) -> u8 {
    let a = (c * ALPHA_MAX + FULL / 2) >> FULL_SHIFT;
    a.min(ALPHA_MAX) as u8
}

impl AlphaFn for NonZeroAlpha {
    #[inline]
    fn alpha(&self, raw: i32) -> u8 {
        scale(raw.unsigned_abs() as u64)
    }
}

impl AlphaFn for EvenOddAlpha {
    #[inline]
    fn alpha(&self, raw: i32) -> u8 {
        let mut c = raw.unsigned_abs() as u64 & (2 * FULL - 1);
        if c > FULL {
            c = 2 * FULL - c;
        }
        scale(c)
    }
}

impl AlphaFn for FillingRule {
    #[inline]
    fn alpha(&self, raw: i32) -> u8 {
        match self {
            FillingRule::NonZero => NonZeroAlpha.alpha(raw),
            FillingRule::EvenOdd => EvenOddAlpha.alpha(raw),
        }
    }
}

impl<F: Fn(i32) -> u8> AlphaFn for F {
    #[inline]
    fn alpha(&self, raw: i32) -> u8 {
        self(raw)
    }
}

/// Raw value of a pixel holding a cell.
#[inline]
pub(crate) fn cell_raw(cover: i32, area: i32) -> i32 {
    saturate(((cover as i64) << AREA_SHIFT) - area as i64)
}

/// Raw value of the pixels between two cells.
#[inline]
pub(crate) fn span_raw(cover: i32) -> i32 {
    saturate((cover as i64) << AREA_SHIFT)
}

#[inline]
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64 + 1, i32::MAX as i64) as i32
}
