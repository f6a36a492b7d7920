//! Coordinate transform converter.
//!
//! Wraps a [`VertexSource`] and maps every vertex through a [`Transformer`].
//! Commands pass through untouched.

use crate::basics::{is_vertex, VertexSource};
use crate::trans_affine::TransAffine;

/// A point mapping applied in place.
pub trait Transformer {
    fn transform(&self, x: &mut f64, y: &mut f64);
}

impl Transformer for TransAffine {
    #[inline]
    fn transform(&self, x: &mut f64, y: &mut f64) {
        TransAffine::transform(self, x, y);
    }
}

impl<F: Fn(f64, f64) -> (f64, f64)> Transformer for F {
    #[inline]
    fn transform(&self, x: &mut f64, y: &mut f64) {
        (*x, *y) = self(*x, *y);
    }
}

/// Applies a [`Transformer`] to each vertex of a source.
pub struct ConvTransform<VS, T = TransAffine> {
    source: VS,
    trans: T,
}

impl<VS: VertexSource, T: Transformer> ConvTransform<VS, T> {
    pub fn new(source: VS, trans: T) -> Self {
        Self { source, trans }
    }

    pub fn set_transformer(&mut self, trans: T) {
        self.trans = trans;
    }

    pub fn transformer(&self) -> &T {
        &self.trans
    }

    pub fn source(&self) -> &VS {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut VS {
        &mut self.source
    }
}

impl<VS: VertexSource, T: Transformer> VertexSource for ConvTransform<VS, T> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        let cmd = self.source.vertex(x, y);
        if is_vertex(cmd) {
            self.trans.transform(x, y);
        }
        cmd
    }
}
