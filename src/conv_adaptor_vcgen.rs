//! Adapter connecting a vertex source to a vertex generator.
//!
//! The source is split at every `move_to`; each sub-path is fed to the
//! generator in full, then the generator's output is drained before the
//! next sub-path is read.

use crate::basics::{
    is_end_poly, is_move_to, is_stop, is_vertex, VertexSource, PATH_CMD_MOVE_TO, PATH_CMD_STOP,
};

/// A stage that consumes a whole sub-path and then emits derived vertices.
pub trait VertexGenerator {
    fn remove_all(&mut self);
    fn add_vertex(&mut self, x: f64, y: f64, cmd: u32);
    fn rewind(&mut self, path_id: u32);
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    Accumulate,
    Generate,
}

/// Drives a [`VertexGenerator`] from a [`VertexSource`], one sub-path at a time.
pub struct ConvAdaptorVcgen<VS, Gen> {
    source: VS,
    generator: Gen,
    status: Status,
    last_cmd: u32,
    start_x: f64,
    start_y: f64,
}

impl<VS: VertexSource, Gen: VertexGenerator> ConvAdaptorVcgen<VS, Gen> {
    pub fn new(source: VS, generator: Gen) -> Self {
        Self {
            source,
            generator,
            status: Status::Initial,
            last_cmd: PATH_CMD_STOP,
            start_x: 0.0,
            start_y: 0.0,
        }
    }

    pub fn generator(&self) -> &Gen {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut Gen {
        &mut self.generator
    }

    pub fn source(&self) -> &VS {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut VS {
        &mut self.source
    }

    pub fn into_parts(self) -> (VS, Gen) {
        (self.source, self.generator)
    }

    /// Feed the next sub-path into the generator. Returns `false` once the
    /// source is exhausted.
    fn accumulate(&mut self, x: &mut f64, y: &mut f64) -> bool {
        if is_stop(self.last_cmd) {
            return false;
        }

        self.generator.remove_all();
        self.generator
            .add_vertex(self.start_x, self.start_y, PATH_CMD_MOVE_TO);

        loop {
            let cmd = self.source.vertex(x, y);
            if is_vertex(cmd) {
                self.last_cmd = cmd;
                if is_move_to(cmd) {
                    self.start_x = *x;
                    self.start_y = *y;
                    break;
                }
                self.generator.add_vertex(*x, *y, cmd);
            } else if is_stop(cmd) {
                self.last_cmd = PATH_CMD_STOP;
                break;
            } else if is_end_poly(cmd) {
                self.generator.add_vertex(*x, *y, cmd);
                break;
            }
        }
        self.generator.rewind(0);
        true
    }
}

impl<VS: VertexSource, Gen: VertexGenerator> VertexSource for ConvAdaptorVcgen<VS, Gen> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
        self.status = Status::Initial;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        loop {
            match self.status {
                Status::Initial => {
                    self.last_cmd = self.source.vertex(&mut self.start_x, &mut self.start_y);
                    self.status = Status::Accumulate;
                }
                Status::Accumulate => {
                    if !self.accumulate(x, y) {
                        return PATH_CMD_STOP;
                    }
                    self.status = Status::Generate;
                }
                Status::Generate => {
                    let cmd = self.generator.vertex(x, y);
                    if !is_stop(cmd) {
                        return cmd;
                    }
                    self.status = Status::Accumulate;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{collect_vertices, PATH_CMD_LINE_TO};
    use crate::path_storage::PathStorage;

    /// Reports each sub-path as a single vertex holding its point count.
    #[derive(Default)]
    struct CountGenerator {
        count: usize,
        emitted: bool,
    }

    impl VertexGenerator for CountGenerator {
        fn remove_all(&mut self) {
            self.count = 0;
        }
        fn add_vertex(&mut self, _x: f64, _y: f64, cmd: u32) {
            if is_vertex(cmd) {
                self.count += 1;
            }
        }
        fn rewind(&mut self, _path_id: u32) {
            self.emitted = false;
        }
        fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
            if self.emitted {
                return PATH_CMD_STOP;
            }
            self.emitted = true;
            *x = self.count as f64;
            *y = 0.0;
            PATH_CMD_LINE_TO
        }
    }

    #[test]
    fn test_splits_at_move_to() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 0.0);
        path.line_to(2.0, 0.0);
        path.move_to(5.0, 5.0);
        path.line_to(6.0, 6.0);

        let mut conv = ConvAdaptorVcgen::new(path, CountGenerator::default());
        let v = collect_vertices(&mut conv, 0);
        let counts: Vec<_> = v.iter().map(|v| v.x as usize).collect();
        assert_eq!(counts, vec![3, 2]);
    }

    #[test]
    fn test_empty_source() {
        let mut conv = ConvAdaptorVcgen::new(PathStorage::new(), CountGenerator::default());
        assert!(collect_vertices(&mut conv, 0).is_empty());
    }
}
