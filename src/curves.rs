//! Bezier curve flattening by forward differencing.
//!
//! The number of steps follows the control polygon length: one segment per
//! four pixels at `approximation_scale = 1`, never fewer than four.

use crate::basics::{uround, VertexSource, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP};

const MIN_STEPS: i32 = 4;

fn num_steps(control_polygon_len: f64, scale: f64) -> i32 {
    (uround(control_polygon_len * 0.25 * scale) as i32).max(MIN_STEPS)
}

// ============================================================================
// Curve3
// ============================================================================

/// Quadratic Bezier curve flattener.
#[derive(Debug, Clone)]
pub struct Curve3 {
    num_steps: i32,
    step: i32,
    scale: f64,
    start: (f64, f64),
    end: (f64, f64),
    f: (f64, f64),
    df: (f64, f64),
    ddf: (f64, f64),
    saved_df: (f64, f64),
}

impl Curve3 {
    pub fn new() -> Self {
        Self {
            num_steps: 0,
            step: -1,
            scale: 1.0,
            start: (0.0, 0.0),
            end: (0.0, 0.0),
            f: (0.0, 0.0),
            df: (0.0, 0.0),
            ddf: (0.0, 0.0),
            saved_df: (0.0, 0.0),
        }
    }

    pub fn reset(&mut self) {
        self.num_steps = 0;
        self.step = -1;
    }

    pub fn init(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.start = (x1, y1);
        self.end = (x3, y3);

        let len = (x2 - x1).hypot(y2 - y1) + (x3 - x2).hypot(y3 - y2);
        self.num_steps = num_steps(len, self.scale);

        let step = 1.0 / self.num_steps as f64;
        let step2 = step * step;

        let tmpx = (x1 - x2 * 2.0 + x3) * step2;
        let tmpy = (y1 - y2 * 2.0 + y3) * step2;

        self.saved_df = (
            tmpx + (x2 - x1) * (2.0 * step),
            tmpy + (y2 - y1) * (2.0 * step),
        );
        self.ddf = (tmpx * 2.0, tmpy * 2.0);
        self.rewind(0);
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.scale = s;
    }

    pub fn approximation_scale(&self) -> f64 {
        self.scale
    }
}

impl Default for Curve3 {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexSource for Curve3 {
    fn rewind(&mut self, _path_id: u32) {
        if self.num_steps == 0 {
            self.step = -1;
            return;
        }
        self.step = self.num_steps;
        self.f = self.start;
        self.df = self.saved_df;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.step < 0 {
            return PATH_CMD_STOP;
        }
        let cmd = if self.step == self.num_steps {
            (*x, *y) = self.start;
            PATH_CMD_MOVE_TO
        } else if self.step == 0 {
            (*x, *y) = self.end;
            PATH_CMD_LINE_TO
        } else {
            self.f.0 += self.df.0;
            self.f.1 += self.df.1;
            self.df.0 += self.ddf.0;
            self.df.1 += self.ddf.1;
            (*x, *y) = self.f;
            PATH_CMD_LINE_TO
        };
        self.step -= 1;
        cmd
    }
}

// ============================================================================
// Curve4
// ============================================================================

/// Cubic Bezier curve flattener.
#[derive(Debug, Clone)]
pub struct Curve4 {
    num_steps: i32,
    step: i32,
    scale: f64,
    start: (f64, f64),
    end: (f64, f64),
    f: (f64, f64),
    df: (f64, f64),
    ddf: (f64, f64),
    dddf: (f64, f64),
    saved_df: (f64, f64),
    saved_ddf: (f64, f64),
}

impl Curve4 {
    pub fn new() -> Self {
        Self {
            num_steps: 0,
            step: -1,
            scale: 1.0,
            start: (0.0, 0.0),
            end: (0.0, 0.0),
            f: (0.0, 0.0),
            df: (0.0, 0.0),
            ddf: (0.0, 0.0),
            dddf: (0.0, 0.0),
            saved_df: (0.0, 0.0),
            saved_ddf: (0.0, 0.0),
        }
    }

    pub fn reset(&mut self) {
        self.num_steps = 0;
        self.step = -1;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn init(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) {
        self.start = (x1, y1);
        self.end = (x4, y4);

        let len = (x2 - x1).hypot(y2 - y1) + (x3 - x2).hypot(y3 - y2) + (x4 - x3).hypot(y4 - y3);
        self.num_steps = num_steps(len, self.scale);

        let step = 1.0 / self.num_steps as f64;
        let step2 = step * step;
        let step3 = step2 * step;

        let pre1 = 3.0 * step;
        let pre2 = 3.0 * step2;
        let pre4 = 6.0 * step2;
        let pre5 = 6.0 * step3;

        let tmp1x = x1 - x2 * 2.0 + x3;
        let tmp1y = y1 - y2 * 2.0 + y3;
        let tmp2x = (x2 - x3) * 3.0 - x1 + x4;
        let tmp2y = (y2 - y3) * 3.0 - y1 + y4;

        self.saved_df = (
            (x2 - x1) * pre1 + tmp1x * pre2 + tmp2x * step3,
            (y2 - y1) * pre1 + tmp1y * pre2 + tmp2y * step3,
        );
        self.saved_ddf = (tmp1x * pre4 + tmp2x * pre5, tmp1y * pre4 + tmp2y * pre5);
        self.dddf = (tmp2x * pre5, tmp2y * pre5);
        self.rewind(0);
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.scale = s;
    }

    pub fn approximation_scale(&self) -> f64 {
        self.scale
    }
}

impl Default for Curve4 {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexSource for Curve4 {
    fn rewind(&mut self, _path_id: u32) {
        if self.num_steps == 0 {
            self.step = -1;
            return;
        }
        self.step = self.num_steps;
        self.f = self.start;
        self.df = self.saved_df;
        self.ddf = self.saved_ddf;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.step < 0 {
            return PATH_CMD_STOP;
        }
        let cmd = if self.step == self.num_steps {
            (*x, *y) = self.start;
            PATH_CMD_MOVE_TO
        } else if self.step == 0 {
            (*x, *y) = self.end;
            PATH_CMD_LINE_TO
        } else {
            self.f.0 += self.df.0;
            self.f.1 += self.df.1;
            self.df.0 += self.ddf.0;
            self.df.1 += self.ddf.1;
            self.ddf.0 += self.dddf.0;
            self.ddf.1 += self.dddf.1;
            (*x, *y) = self.f;
            PATH_CMD_LINE_TO
        };
        self.step -= 1;
        cmd
    }
}
