//! Curve flattening converter.
//!
//! Replaces `curve3`/`curve4` command runs with `line_to` sequences so that
//! downstream stages (stroker, rasterizer) only ever see straight edges.

use crate::basics::{is_stop, VertexSource, PATH_CMD_CURVE3, PATH_CMD_CURVE4, PATH_CMD_LINE_TO};
use crate::curves::{Curve3, Curve4};

/// Curve flattening converter.
pub struct ConvCurve<VS> {
    source: VS,
    last_x: f64,
    last_y: f64,
    curve3: Curve3,
    curve4: Curve4,
}

impl<VS: VertexSource> ConvCurve<VS> {
    pub fn new(source: VS) -> Self {
        Self {
            source,
            last_x: 0.0,
            last_y: 0.0,
            curve3: Curve3::new(),
            curve4: Curve4::new(),
        }
    }

    pub fn source(&self) -> &VS {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut VS {
        &mut self.source
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.curve3.set_approximation_scale(s);
        self.curve4.set_approximation_scale(s);
    }

    pub fn approximation_scale(&self) -> f64 {
        self.curve4.approximation_scale()
    }
}

impl<VS: VertexSource> VertexSource for ConvCurve<VS> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
        self.last_x = 0.0;
        self.last_y = 0.0;
        self.curve3.reset();
        self.curve4.reset();
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if !is_stop(self.curve3.vertex(x, y)) || !is_stop(self.curve4.vertex(x, y)) {
            self.last_x = *x;
            self.last_y = *y;
            return PATH_CMD_LINE_TO;
        }

        let mut cmd = self.source.vertex(x, y);
        match cmd {
            PATH_CMD_CURVE3 => {
                let (mut end_x, mut end_y) = (0.0, 0.0);
                self.source.vertex(&mut end_x, &mut end_y);
                self.curve3
                    .init(self.last_x, self.last_y, *x, *y, end_x, end_y);
                // Skip the curve's own move_to.
                self.curve3.vertex(x, y);
                self.curve3.vertex(x, y);
                cmd = PATH_CMD_LINE_TO;
            }
            PATH_CMD_CURVE4 => {
                let (mut ct2_x, mut ct2_y) = (0.0, 0.0);
                let (mut end_x, mut end_y) = (0.0, 0.0);
                self.source.vertex(&mut ct2_x, &mut ct2_y);
                self.source.vertex(&mut end_x, &mut end_y);
                self.curve4
                    .init(self.last_x, self.last_y, *x, *y, ct2_x, ct2_y, end_x, end_y);
                self.curve4.vertex(x, y);
                self.curve4.vertex(x, y);
                cmd = PATH_CMD_LINE_TO;
            }
            _ => {}
        }

        self.last_x = *x;
        self.last_y = *y;
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{collect_vertices, is_close, PATH_CMD_MOVE_TO};
    use crate::path_storage::PathStorage;

    #[test]
    fn test_lines_pass_through() {
        let mut path = PathStorage::new();
        path.move_to(1.0, 2.0);
        path.line_to(3.0, 4.0);
        path.close_polygon();
        let mut conv = ConvCurve::new(path);
        let v = collect_vertices(&mut conv, 0);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0].cmd, PATH_CMD_MOVE_TO);
        assert!(is_close(v[2].cmd));
    }

    #[test]
    fn test_curves_become_line_to() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.curve3(50.0, 100.0, 100.0, 0.0);
        path.curve4(100.0, -50.0, 0.0, -50.0, 0.0, 0.0);
        let mut conv = ConvCurve::new(path);
        let v = collect_vertices(&mut conv, 0);
        assert!(v.len() > 10);
        assert_eq!(v[0].cmd, PATH_CMD_MOVE_TO);
        assert!(v[1..].iter().all(|v| v.cmd == PATH_CMD_LINE_TO));
        let last = v[v.len() - 1];
        assert!(last.x.abs() < 1e-9 && last.y.abs() < 1e-9);
        // The quadratic ends exactly at its end point before the cubic starts.
        assert!(v.iter().any(|v| v.x == 100.0 && v.y == 0.0));
    }
}
