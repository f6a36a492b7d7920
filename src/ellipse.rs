//! Ellipse vertex generator.
//!
//! Emits a closed regular polygon approximating an axis-aligned ellipse.
//! The step count is either explicit or derived from the radii and the
//! approximation scale, using the same tolerance as round caps and joins.

use crate::basics::{
    uround, VertexSource, PATH_CMD_END_POLY, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP,
    PATH_FLAGS_CCW, PATH_FLAGS_CLOSE, PATH_FLAGS_CW, PI,
};

const MIN_STEPS: u32 = 4;

#[derive(Debug, Clone)]
pub struct Ellipse {
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    scale: f64,
    num: u32,
    auto_steps: bool,
    step: u32,
    cw: bool,
}

impl Ellipse {
    /// `num_steps == 0` picks the step count automatically.
    pub fn new(x: f64, y: f64, rx: f64, ry: f64, num_steps: u32, cw: bool) -> Self {
        let mut e = Self {
            x,
            y,
            rx,
            ry,
            scale: 1.0,
            num: num_steps,
            auto_steps: num_steps == 0,
            step: 0,
            cw,
        };
        if e.auto_steps {
            e.calc_num_steps();
        }
        e
    }

    pub fn set_approximation_scale(&mut self, scale: f64) {
        self.scale = scale;
        if self.auto_steps {
            self.calc_num_steps();
        }
    }

    pub fn num_steps(&self) -> u32 {
        self.num
    }

    fn calc_num_steps(&mut self) {
        let ra = (self.rx.abs() + self.ry.abs()) / 2.0;
        let da = (ra / (ra + 0.125 / self.scale)).acos() * 2.0;
        let n = 2.0 * PI / da;
        self.num = if n.is_finite() {
            uround(n).max(MIN_STEPS)
        } else {
            MIN_STEPS
        };
    }
}

impl VertexSource for Ellipse {
    fn rewind(&mut self, _path_id: u32) {
        self.step = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.step == self.num {
            self.step += 1;
            let orientation = if self.cw { PATH_FLAGS_CW } else { PATH_FLAGS_CCW };
            return PATH_CMD_END_POLY | PATH_FLAGS_CLOSE | orientation;
        }
        if self.step > self.num {
            return PATH_CMD_STOP;
        }
        let mut angle = self.step as f64 / self.num as f64 * 2.0 * PI;
        if self.cw {
            angle = 2.0 * PI - angle;
        }
        *x = self.x + angle.cos() * self.rx;
        *y = self.y + angle.sin() * self.ry;
        self.step += 1;
        if self.step == 1 {
            PATH_CMD_MOVE_TO
        } else {
            PATH_CMD_LINE_TO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{collect_vertices, is_close, is_cw, is_vertex, PointD};
    use crate::math::calc_polygon_area;

    #[test]
    fn test_explicit_steps() {
        let mut e = Ellipse::new(0.0, 0.0, 10.0, 10.0, 8, false);
        let v = collect_vertices(&mut e, 0);
        assert_eq!(v.len(), 9);
        assert_eq!(v[0].cmd, PATH_CMD_MOVE_TO);
        assert!((v[0].x - 10.0).abs() < 1e-12 && v[0].y.abs() < 1e-12);
        assert!(is_close(v[8].cmd));
        for p in &v[..8] {
            assert!((p.x.hypot(p.y) - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_auto_steps_grow_with_radius_and_scale() {
        let small = Ellipse::new(0.0, 0.0, 2.0, 2.0, 0, false);
        let large = Ellipse::new(0.0, 0.0, 200.0, 200.0, 0, false);
        assert!(small.num_steps() >= 4);
        assert!(large.num_steps() > small.num_steps());

        let mut scaled = Ellipse::new(0.0, 0.0, 200.0, 200.0, 0, false);
        scaled.set_approximation_scale(4.0);
        assert!(scaled.num_steps() > large.num_steps());
    }

    #[test]
    fn test_zero_radius_is_still_finite() {
        let mut e = Ellipse::new(5.0, 5.0, 0.0, 0.0, 0, false);
        assert_eq!(e.num_steps(), 4);
        assert_eq!(collect_vertices(&mut e, 0).len(), 5);
    }

    #[test]
    fn test_orientation() {
        let area = |cw: bool| {
            let mut e = Ellipse::new(0.0, 0.0, 10.0, 5.0, 32, cw);
            let v = collect_vertices(&mut e, 0);
            let pts: Vec<PointD> = v
                .iter()
                .filter(|v| is_vertex(v.cmd))
                .map(|v| PointD::new(v.x, v.y))
                .collect();
            (calc_polygon_area(&pts), is_cw(v[v.len() - 1].cmd))
        };
        let (ccw_area, ccw_flag) = area(false);
        let (cw_area, cw_flag) = area(true);
        assert!(ccw_area > 0.0 && cw_area < 0.0);
        assert!(!ccw_flag && cw_flag);
    }
}
