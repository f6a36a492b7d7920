//! Stroke converter for vertex sources.
//!
//! Combines [`ConvAdaptorVcgen`] with [`VcgenStroke`] to stroke any vertex
//! source. The result is itself a [`VertexSource`] of closed polygons that
//! can be handed straight to the rasterizer.

use std::borrow::BorrowMut;

use crate::basics::VertexSource;
use crate::conv_adaptor_vcgen::ConvAdaptorVcgen;
use crate::math_stroke::{InnerJoin, LineCap, LineJoin, StrokeParams};
use crate::vcgen_stroke::{StrokeWorkspace, VcgenStroke};

/// Stroke converter: generates a stroked outline from a center-line path.
pub struct ConvStroke<VS, W = StrokeWorkspace> {
    base: ConvAdaptorVcgen<VS, VcgenStroke<W>>,
}

impl<VS: VertexSource> ConvStroke<VS> {
    pub fn new(source: VS) -> Self {
        Self {
            base: ConvAdaptorVcgen::new(source, VcgenStroke::new()),
        }
    }
}

impl<VS: VertexSource, W: BorrowMut<StrokeWorkspace>> ConvStroke<VS, W> {
    /// Stroke `source` using externally owned scratch storage.
    pub fn with_workspace(source: VS, workspace: W) -> Self {
        Self {
            base: ConvAdaptorVcgen::new(source, VcgenStroke::with_workspace(workspace)),
        }
    }

    pub fn params(&self) -> &StrokeParams {
        self.base.generator().params()
    }
    pub fn set_params(&mut self, params: StrokeParams) {
        self.base.generator_mut().set_params(params);
    }

    pub fn set_line_cap(&mut self, lc: LineCap) {
        self.base.generator_mut().set_line_cap(lc);
    }
    pub fn line_cap(&self) -> LineCap {
        self.base.generator().line_cap()
    }

    pub fn set_line_join(&mut self, lj: LineJoin) {
        self.base.generator_mut().set_line_join(lj);
    }
    pub fn line_join(&self) -> LineJoin {
        self.base.generator().line_join()
    }

    pub fn set_inner_join(&mut self, ij: InnerJoin) {
        self.base.generator_mut().set_inner_join(ij);
    }
    pub fn inner_join(&self) -> InnerJoin {
        self.base.generator().inner_join()
    }

    pub fn set_width(&mut self, w: f64) {
        self.base.generator_mut().set_width(w);
    }
    pub fn width(&self) -> f64 {
        self.base.generator().width()
    }

    pub fn set_miter_limit(&mut self, ml: f64) {
        self.base.generator_mut().set_miter_limit(ml);
    }
    pub fn miter_limit(&self) -> f64 {
        self.base.generator().miter_limit()
    }

    pub fn set_miter_limit_theta(&mut self, t: f64) {
        self.base.generator_mut().set_miter_limit_theta(t);
    }

    pub fn set_inner_miter_limit(&mut self, ml: f64) {
        self.base.generator_mut().set_inner_miter_limit(ml);
    }
    pub fn inner_miter_limit(&self) -> f64 {
        self.base.generator().inner_miter_limit()
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.base.generator_mut().set_approximation_scale(s);
    }
    pub fn approximation_scale(&self) -> f64 {
        self.base.generator().approximation_scale()
    }

    pub fn set_shorten(&mut self, s: f64) {
        self.base.generator_mut().set_shorten(s);
    }
    pub fn shorten(&self) -> f64 {
        self.base.generator().shorten()
    }

    pub fn source(&self) -> &VS {
        self.base.source()
    }

    pub fn source_mut(&mut self) -> &mut VS {
        self.base.source_mut()
    }

    /// Tear down the converter, returning the source and the workspace.
    pub fn into_parts(self) -> (VS, W) {
        let (source, gen) = self.base.into_parts();
        (source, gen.into_workspace())
    }
}

impl<VS: VertexSource, W: BorrowMut<StrokeWorkspace>> VertexSource for ConvStroke<VS, W> {
    fn rewind(&mut self, path_id: u32) {
        self.base.rewind(path_id);
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        self.base.vertex(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================
