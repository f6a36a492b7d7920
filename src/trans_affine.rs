//! Affine transformation matrix.
//!
//! A 2x3 matrix applied to path coordinates ahead of stroking or
//! rasterization. Composition follows the "apply self, then other" order:
//! `a * b` transforms by `a` first and by `b` second.

use std::ops::Mul;

/// 2D affine transformation matrix.
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    pub const IDENTITY: TransAffine = TransAffine {
        sx: 1.0,
        shy: 0.0,
        shx: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Rotation by `a` radians around the origin.
    pub fn rotation(a: f64) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new(ca, sa, -sa, ca, 0.0, 0.0)
    }

    pub fn scaling(x: f64, y: f64) -> Self {
        Self::new(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.tx += x;
        self.ty += y;
        self
    }

    pub fn rotate(&mut self, a: f64) -> &mut Self {
        self.multiply(&Self::rotation(a))
    }

    pub fn scale(&mut self, x: f64, y: f64) -> &mut Self {
        self.sx *= x;
        self.shx *= x;
        self.tx *= x;
        self.shy *= y;
        self.sy *= y;
        self.ty *= y;
        self
    }

    /// `self = self * m`: apply `self`, then `m`.
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        let sx = self.sx * m.sx + self.shy * m.shx;
        let shx = self.shx * m.sx + self.sy * m.shx;
        let tx = self.tx * m.sx + self.ty * m.shx + m.tx;
        self.shy = self.sx * m.shy + self.shy * m.sy;
        self.sy = self.shx * m.shy + self.sy * m.sy;
        self.ty = self.tx * m.shy + self.ty * m.sy + m.ty;
        self.sx = sx;
        self.shx = shx;
        self.tx = tx;
        self
    }

    /// Invert in place. A singular matrix yields non-finite components.
    pub fn invert(&mut self) -> &mut Self {
        let d = 1.0 / self.determinant();
        let sx = self.sy * d;
        self.sy = self.sx * d;
        self.shy = -self.shy * d;
        self.shx = -self.shx * d;
        let tx = -self.tx * sx - self.ty * self.shx;
        self.ty = -self.tx * self.shy - self.ty * self.sy;
        self.sx = sx;
        self.tx = tx;
        self
    }

    #[inline]
    pub fn transform(&self, x: &mut f64, y: &mut f64) {
        let tmp = *x;
        *x = tmp * self.sx + *y * self.shx + self.tx;
        *y = tmp * self.shy + *y * self.sy + self.ty;
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Average linear scale factor. Feed it to `set_approximation_scale`
    /// of curve and stroke stages that run before the transform.
    pub fn average_scale(&self) -> f64 {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let x = s * self.sx + s * self.shx;
        let y = s * self.shy + s * self.sy;
        x.hypot(y)
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        let m = [self.sx, self.shy, self.shx, self.sy, self.tx, self.ty];
        let id = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        m.iter().zip(id).all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for TransAffine {
    type Output = TransAffine;

    fn mul(mut self, rhs: TransAffine) -> TransAffine {
        self.multiply(&rhs);
        self
    }
}
