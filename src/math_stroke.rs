//! Stroke math: cap, join and miter geometry for stroked paths.
//!
//! All offsets are computed at half the stroke width on the left side of the
//! travel direction; the stroke generator walks the path forward and then
//! backward so both sides are covered.

use crate::basics::{PointD, PI};
use crate::math::{calc_distance, calc_intersection, cross_product};
use crate::vertex_sequence::VertexDist;

/// Upper bound on interior points emitted for one round cap or join.
pub const MAX_ARC_STEPS: usize = 1024;

// ============================================================================
// Enums
// ============================================================================

/// Line cap style for open path endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Square,
    Round,
}

/// Outer join style at path corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Extend both offset edges to their intersection. Beyond the miter
    /// limit the join degrades to [`LineJoin::Bevel`].
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Join style for the concave side of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InnerJoin {
    Bevel,
    #[default]
    Miter,
    Jag,
    Round,
}

// ============================================================================
// StrokeParams
// ============================================================================

/// Full stroke parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
    /// Full stroke width. Non-positive widths produce no outline.
    pub width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub inner_join: InnerJoin,
    /// Maximum ratio of miter length to half the width.
    pub miter_limit: f64,
    pub inner_miter_limit: f64,
    /// Flattening density for round caps and joins. Larger is finer.
    pub approximation_scale: f64,
    /// Length trimmed from each end of open paths.
    pub shorten: f64,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            inner_join: InnerJoin::Miter,
            miter_limit: 4.0,
            inner_miter_limit: 1.01,
            approximation_scale: 1.0,
            shorten: 0.0,
        }
    }
}

impl StrokeParams {
    /// Set the miter limit from the smallest join angle (radians) that
    /// still gets a full miter.
    pub fn set_miter_limit_theta(&mut self, t: f64) {
        self.miter_limit = 1.0 / (t * 0.5).sin();
    }
}

// ============================================================================
// MathStroke
// ============================================================================

/// Stroke geometry calculator.
///
/// Computes cap and join vertices for stroked paths. Output vertices are
/// pushed into a `Vec<PointD>` consumer, which is cleared first.
#[derive(Debug, Clone)]
pub struct MathStroke {
    params: StrokeParams,
    width: f64,
    width_eps: f64,
}

impl MathStroke {
    pub fn new() -> Self {
        Self::with_params(StrokeParams::default())
    }

    pub fn with_params(params: StrokeParams) -> Self {
        let mut ms = Self {
            params,
            width: 0.0,
            width_eps: 0.0,
        };
        ms.set_width(params.width);
        ms
    }

    pub fn params(&self) -> &StrokeParams {
        &self.params
    }

    pub fn set_params(&mut self, params: StrokeParams) {
        *self = Self::with_params(params);
    }

    pub fn set_line_cap(&mut self, lc: LineCap) {
        self.params.line_cap = lc;
    }
    pub fn line_cap(&self) -> LineCap {
        self.params.line_cap
    }

    pub fn set_line_join(&mut self, lj: LineJoin) {
        self.params.line_join = lj;
    }
    pub fn line_join(&self) -> LineJoin {
        self.params.line_join
    }

    pub fn set_inner_join(&mut self, ij: InnerJoin) {
        self.params.inner_join = ij;
    }
    pub fn inner_join(&self) -> InnerJoin {
        self.params.inner_join
    }

    pub fn set_width(&mut self, w: f64) {
        self.params.width = w;
        self.width = w * 0.5;
        self.width_eps = self.width / 1024.0;
    }

    pub fn width(&self) -> f64 {
        self.params.width
    }

    pub fn set_miter_limit(&mut self, ml: f64) {
        self.params.miter_limit = ml;
    }
    pub fn miter_limit(&self) -> f64 {
        self.params.miter_limit
    }

    pub fn set_miter_limit_theta(&mut self, t: f64) {
        self.params.set_miter_limit_theta(t);
    }

    pub fn set_inner_miter_limit(&mut self, ml: f64) {
        self.params.inner_miter_limit = ml;
    }
    pub fn inner_miter_limit(&self) -> f64 {
        self.params.inner_miter_limit
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.params.approximation_scale = s;
    }
    pub fn approximation_scale(&self) -> f64 {
        self.params.approximation_scale
    }

    pub fn set_shorten(&mut self, s: f64) {
        self.params.shorten = s;
    }
    pub fn shorten(&self) -> f64 {
        self.params.shorten
    }

    /// Angular step for arcs of radius `width / 2`: the chord never strays
    /// more than `0.125 / approximation_scale` pixels from the true arc.
    fn arc_step(&self) -> f64 {
        let scale = if self.params.approximation_scale > 0.0 {
            self.params.approximation_scale
        } else {
            1.0
        };
        (self.width / (self.width + 0.125 / scale)).acos() * 2.0
    }

    /// Interior point count for an arc sweeping `sweep` radians.
    fn arc_steps(&self, sweep: f64) -> usize {
        ((sweep / self.arc_step()) as usize).min(MAX_ARC_STEPS)
    }

    /// Calculate cap vertices at a line endpoint.
    ///
    /// `v0` is the endpoint, `v1` is the adjacent vertex, `len` is the
    /// distance between them.
    pub fn calc_cap(&self, vc: &mut Vec<PointD>, v0: &VertexDist, v1: &VertexDist, len: f64) {
        vc.clear();

        let dx1 = (v1.y - v0.y) / len * self.width;
        let dy1 = (v1.x - v0.x) / len * self.width;

        match self.params.line_cap {
            LineCap::Butt | LineCap::Square => {
                let (dx2, dy2) = if self.params.line_cap == LineCap::Square {
                    (dy1, dx1)
                } else {
                    (0.0, 0.0)
                };
                vc.push(PointD::new(v0.x - dx1 - dx2, v0.y + dy1 - dy2));
                vc.push(PointD::new(v0.x + dx1 - dx2, v0.y - dy1 - dy2));
            }
            LineCap::Round => {
                let n = self.arc_steps(PI);
                let da = PI / (n + 1) as f64;

                vc.push(PointD::new(v0.x - dx1, v0.y + dy1));
                let mut a1 = dy1.atan2(-dx1) + da;
                for _ in 0..n {
                    vc.push(PointD::new(
                        v0.x + a1.cos() * self.width,
                        v0.y + a1.sin() * self.width,
                    ));
                    a1 += da;
                }
                vc.push(PointD::new(v0.x + dx1, v0.y - dy1));
            }
        }
    }

    /// Calculate join vertices at the junction of two line segments.
    ///
    /// `v0`→`v1` is the first segment, `v1`→`v2` is the second.
    /// `len1` and `len2` are the segment lengths.
    pub fn calc_join(
        &self,
        vc: &mut Vec<PointD>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        len1: f64,
        len2: f64,
    ) {
        let dx1 = self.width * (v1.y - v0.y) / len1;
        let dy1 = self.width * (v1.x - v0.x) / len1;
        let dx2 = self.width * (v2.y - v1.y) / len2;
        let dy2 = self.width * (v2.x - v1.x) / len2;

        vc.clear();

        let cp = cross_product(v0.x, v0.y, v1.x, v1.y, v2.x, v2.y);
        if cp > 0.0 {
            // Inner join
            let limit = (len1.min(len2) / self.width).max(self.params.inner_miter_limit);

            match self.params.inner_join {
                InnerJoin::Bevel => {
                    vc.push(PointD::new(v1.x + dx1, v1.y - dy1));
                    vc.push(PointD::new(v1.x + dx2, v1.y - dy2));
                }
                InnerJoin::Miter => {
                    self.calc_miter(vc, v0, v1, v2, dx1, dy1, dx2, dy2, limit);
                }
                InnerJoin::Jag | InnerJoin::Round => {
                    let d = (dx1 - dx2) * (dx1 - dx2) + (dy1 - dy2) * (dy1 - dy2);
                    if d < len1 * len1 && d < len2 * len2 {
                        self.calc_miter(vc, v0, v1, v2, dx1, dy1, dx2, dy2, limit);
                    } else if self.params.inner_join == InnerJoin::Jag {
                        vc.push(PointD::new(v1.x + dx1, v1.y - dy1));
                        vc.push(PointD::new(v1.x, v1.y));
                        vc.push(PointD::new(v1.x + dx2, v1.y - dy2));
                    } else {
                        vc.push(PointD::new(v1.x + dx1, v1.y - dy1));
                        vc.push(PointD::new(v1.x, v1.y));
                        self.calc_arc(vc, v1.x, v1.y, dx2, -dy2, dx1, -dy1);
                        vc.push(PointD::new(v1.x, v1.y));
                        vc.push(PointD::new(v1.x + dx2, v1.y - dy2));
                    }
                }
            }
            return;
        }

        // Outer join
        let dx = (dx1 + dx2) / 2.0;
        let dy = (dy1 + dy2) / 2.0;
        let dbevel = (dx * dx + dy * dy).sqrt();

        // Nearly collinear: both offset edges meet at a single point.
        if self.params.line_join != LineJoin::Miter
            && self.params.approximation_scale * (self.width - dbevel) < self.width_eps
        {
            match calc_intersection(
                v0.x + dx1,
                v0.y - dy1,
                v1.x + dx1,
                v1.y - dy1,
                v1.x + dx2,
                v1.y - dy2,
                v2.x + dx2,
                v2.y - dy2,
            ) {
                Some((ix, iy)) => vc.push(PointD::new(ix, iy)),
                None => vc.push(PointD::new(v1.x + dx1, v1.y - dy1)),
            }
            return;
        }

        match self.params.line_join {
            LineJoin::Miter => {
                self.calc_miter(vc, v0, v1, v2, dx1, dy1, dx2, dy2, self.params.miter_limit);
            }
            LineJoin::Round => {
                self.calc_arc(vc, v1.x, v1.y, dx1, -dy1, dx2, -dy2);
            }
            LineJoin::Bevel => {
                vc.push(PointD::new(v1.x + dx1, v1.y - dy1));
                vc.push(PointD::new(v1.x + dx2, v1.y - dy2));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn calc_arc(
        &self,
        vc: &mut Vec<PointD>,
        x: f64,
        y: f64,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
    ) {
        let mut a1 = dy1.atan2(dx1);
        let mut a2 = dy2.atan2(dx2);
        if a1 > a2 {
            a2 += 2.0 * PI;
        }

        vc.push(PointD::new(x + dx1, y + dy1));

        let n = self.arc_steps(a2 - a1);
        let da = (a2 - a1) / (n + 1) as f64;
        a1 += da;
        for _ in 0..n {
            vc.push(PointD::new(x + a1.cos() * self.width, y + a1.sin() * self.width));
            a1 += da;
        }

        vc.push(PointD::new(x + dx2, y + dy2));
    }

    /// Miter with bevel fallback: the intersection of the two offset edges
    /// when it lies within `mlimit * width / 2` of the vertex, otherwise the
    /// two offset edge endpoints.
    #[allow(clippy::too_many_arguments)]
    fn calc_miter(
        &self,
        vc: &mut Vec<PointD>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        mlimit: f64,
    ) {
        let lim = self.width * mlimit;

        match calc_intersection(
            v0.x + dx1,
            v0.y - dy1,
            v1.x + dx1,
            v1.y - dy1,
            v1.x + dx2,
            v1.y - dy2,
            v2.x + dx2,
            v2.y - dy2,
        ) {
            Some((xi, yi)) => {
                if calc_distance(v1.x, v1.y, xi, yi) <= lim {
                    vc.push(PointD::new(xi, yi));
                    return;
                }
            }
            None => {
                // Parallel offsets: a straight continuation shares one point.
                let x2 = v1.x + dx1;
                let y2 = v1.y - dy1;
                if (cross_product(v0.x, v0.y, v1.x, v1.y, x2, y2) < 0.0)
                    == (cross_product(v1.x, v1.y, v2.x, v2.y, x2, y2) < 0.0)
                {
                    vc.push(PointD::new(x2, y2));
                    return;
                }
            }
        }

        vc.push(PointD::new(v1.x + dx1, v1.y - dy1));
        vc.push(PointD::new(v1.x + dx2, v1.y - dy2));
    }
}

impl Default for MathStroke {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
