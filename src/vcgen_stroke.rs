//! Stroke vertex generator.
//!
//! Generates a stroked outline from a center-line path using [`MathStroke`].
//! The centerline and the per-vertex output buffer live in a
//! [`StrokeWorkspace`], which the generator either owns or borrows so a
//! single allocation can serve many stroke operations in turn.

use std::borrow::{Borrow, BorrowMut};

use crate::basics::{
    get_close_flag, is_move_to, is_vertex, PointD, PATH_CMD_END_POLY, PATH_CMD_LINE_TO,
    PATH_CMD_MOVE_TO, PATH_CMD_STOP, PATH_FLAGS_CCW, PATH_FLAGS_CLOSE, PATH_FLAGS_CW,
};
use crate::conv_adaptor_vcgen::VertexGenerator;
use crate::math_stroke::{InnerJoin, LineCap, LineJoin, MathStroke, StrokeParams};
use crate::vertex_sequence::{shorten_path, VertexDist, VertexSequence};

// ============================================================================
// StrokeWorkspace
// ============================================================================

/// Lifecycle of a [`StrokeWorkspace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceState {
    #[default]
    Idle,
    Accumulating,
    Ready,
}

/// Scratch storage for one stroke computation at a time.
///
/// `reset` → `append`* → `finalize`, then the generator reads the
/// finalized centerline and writes join/cap points into the output buffer.
/// Buffers keep their capacity across resets.
#[derive(Debug, Clone, Default)]
pub struct StrokeWorkspace {
    src_vertices: VertexSequence,
    out_vertices: Vec<PointD>,
    closed: bool,
    state: WorkspaceState,
}

impl StrokeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkspaceState {
        self.state
    }

    /// Discard the current centerline.
    pub fn reset(&mut self) {
        self.src_vertices.remove_all();
        self.out_vertices.clear();
        self.closed = false;
        self.state = WorkspaceState::Idle;
    }

    /// Add one centerline command. `move_to` replaces a dangling start
    /// point, `end_poly` records whether the path is closed.
    pub fn append(&mut self, x: f64, y: f64, cmd: u32) {
        if self.state == WorkspaceState::Ready {
            self.reset();
        }
        self.state = WorkspaceState::Accumulating;
        if is_move_to(cmd) {
            self.src_vertices.modify_last(VertexDist::new(x, y));
        } else if is_vertex(cmd) {
            self.src_vertices.add(VertexDist::new(x, y));
        } else {
            self.closed = get_close_flag(cmd) != 0;
        }
    }

    /// Close the centerline and trim `shorten` from its open ends.
    /// Calling it again without new input is a no-op.
    pub fn finalize(&mut self, shorten: f64) {
        if self.state == WorkspaceState::Ready {
            return;
        }
        self.src_vertices.close(self.closed);
        shorten_path(&mut self.src_vertices, shorten, self.closed);
        if self.src_vertices.size() < 3 {
            self.closed = false;
        }
        self.state = WorkspaceState::Ready;
    }

    pub fn vertices(&self) -> &VertexSequence {
        &self.src_vertices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

// ============================================================================
// VcgenStroke
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    Ready,
    Cap1,
    Cap2,
    Outline1,
    CloseFirst,
    Outline2,
    OutVertices,
    EndPoly1,
    EndPoly2,
    Stop,
}

/// Stroke vertex generator.
///
/// Open paths come out as one closed polygon (cap, left side, cap, right
/// side). Closed paths come out as two closed polygons of opposite
/// orientation, the first flagged CCW and the second CW.
pub struct VcgenStroke<W = StrokeWorkspace> {
    stroker: MathStroke,
    ws: W,
    status: Status,
    prev_status: Status,
    src_vertex: usize,
    out_vertex: usize,
}

impl VcgenStroke<StrokeWorkspace> {
    pub fn new() -> Self {
        Self::with_workspace(StrokeWorkspace::new())
    }
}

impl Default for VcgenStroke<StrokeWorkspace> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: BorrowMut<StrokeWorkspace>> VcgenStroke<W> {
    /// Build a generator over an owned or borrowed (`&mut StrokeWorkspace`)
    /// workspace. The workspace is reset.
    pub fn with_workspace(mut ws: W) -> Self {
        let scratch: &mut StrokeWorkspace = ws.borrow_mut();
        scratch.reset();
        Self {
            stroker: MathStroke::new(),
            ws,
            status: Status::Initial,
            prev_status: Status::Initial,
            src_vertex: 0,
            out_vertex: 0,
        }
    }

    /// Give the workspace back.
    pub fn into_workspace(self) -> W {
        self.ws
    }

    pub fn params(&self) -> &StrokeParams {
        self.stroker.params()
    }
    pub fn set_params(&mut self, params: StrokeParams) {
        self.stroker.set_params(params);
        self.status = Status::Initial;
    }

    pub fn set_line_cap(&mut self, lc: LineCap) {
        self.stroker.set_line_cap(lc);
    }
    pub fn line_cap(&self) -> LineCap {
        self.stroker.line_cap()
    }

    pub fn set_line_join(&mut self, lj: LineJoin) {
        self.stroker.set_line_join(lj);
    }
    pub fn line_join(&self) -> LineJoin {
        self.stroker.line_join()
    }

    pub fn set_inner_join(&mut self, ij: InnerJoin) {
        self.stroker.set_inner_join(ij);
    }
    pub fn inner_join(&self) -> InnerJoin {
        self.stroker.inner_join()
    }

    pub fn set_width(&mut self, w: f64) {
        self.stroker.set_width(w);
    }
    pub fn width(&self) -> f64 {
        self.stroker.width()
    }

    pub fn set_miter_limit(&mut self, ml: f64) {
        self.stroker.set_miter_limit(ml);
    }
    pub fn miter_limit(&self) -> f64 {
        self.stroker.miter_limit()
    }

    pub fn set_miter_limit_theta(&mut self, t: f64) {
        self.stroker.set_miter_limit_theta(t);
    }

    pub fn set_inner_miter_limit(&mut self, ml: f64) {
        self.stroker.set_inner_miter_limit(ml);
    }
    pub fn inner_miter_limit(&self) -> f64 {
        self.stroker.inner_miter_limit()
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.stroker.set_approximation_scale(s);
    }
    pub fn approximation_scale(&self) -> f64 {
        self.stroker.approximation_scale()
    }

    pub fn set_shorten(&mut self, s: f64) {
        self.stroker.set_shorten(s);
    }
    pub fn shorten(&self) -> f64 {
        self.stroker.shorten()
    }

    // Vertex Generator Interface
    pub fn remove_all(&mut self) {
        let ws: &mut StrokeWorkspace = self.ws.borrow_mut();
        ws.reset();
        self.status = Status::Initial;
    }

    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        self.status = Status::Initial;
        let ws: &mut StrokeWorkspace = self.ws.borrow_mut();
        ws.append(x, y, cmd);
    }

    // Vertex Source Interface
    pub fn rewind(&mut self, _path_id: u32) {
        if self.status == Status::Initial {
            let shorten = self.stroker.shorten();
            let ws: &mut StrokeWorkspace = self.ws.borrow_mut();
            ws.finalize(shorten);
            if self.stroker.width() <= 0.0 || ws.src_vertices.size() < 2 {
                log::trace!(
                    "stroke: dropping degenerate path ({} vertices, width {})",
                    ws.src_vertices.size(),
                    self.stroker.width()
                );
            }
        }
        self.status = Status::Ready;
        self.src_vertex = 0;
        self.out_vertex = 0;
    }

    pub fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        let mut cmd = PATH_CMD_LINE_TO;
        loop {
            match self.status {
                Status::Initial => {
                    self.rewind(0);
                }
                Status::Ready => {
                    let ws: &StrokeWorkspace = self.ws.borrow();
                    if self.stroker.width() <= 0.0
                        || ws.src_vertices.size() < 2 + ws.closed as usize
                    {
                        return PATH_CMD_STOP;
                    }
                    self.status = if ws.closed {
                        Status::Outline1
                    } else {
                        Status::Cap1
                    };
                    cmd = PATH_CMD_MOVE_TO;
                    self.src_vertex = 0;
                    self.out_vertex = 0;
                }
                Status::Cap1 => {
                    let ws: &mut StrokeWorkspace = self.ws.borrow_mut();
                    let v0 = *ws.src_vertices.curr(0);
                    let v1 = *ws.src_vertices.curr(1);
                    self.stroker
                        .calc_cap(&mut ws.out_vertices, &v0, &v1, v0.dist);
                    self.src_vertex = 1;
                    self.prev_status = Status::Outline1;
                    self.status = Status::OutVertices;
                    self.out_vertex = 0;
                }
                Status::Cap2 => {
                    let ws: &mut StrokeWorkspace = self.ws.borrow_mut();
                    let n = ws.src_vertices.size();
                    let v0 = *ws.src_vertices.curr(n - 1);
                    let v1 = *ws.src_vertices.curr(n - 2);
                    self.stroker
                        .calc_cap(&mut ws.out_vertices, &v0, &v1, v1.dist);
                    self.prev_status = Status::Outline2;
                    self.status = Status::OutVertices;
                    self.out_vertex = 0;
                }
                Status::Outline1 => {
                    let ws: &mut StrokeWorkspace = self.ws.borrow_mut();
                    let n = ws.src_vertices.size();
                    if ws.closed {
                        if self.src_vertex >= n {
                            self.prev_status = Status::CloseFirst;
                            self.status = Status::EndPoly1;
                            continue;
                        }
                    } else if self.src_vertex >= n - 1 {
                        self.status = Status::Cap2;
                        continue;
                    }
                    let v_prev = *ws.src_vertices.prev(self.src_vertex);
                    let v_curr = *ws.src_vertices.curr(self.src_vertex);
                    let v_next = *ws.src_vertices.next(self.src_vertex);
                    self.stroker.calc_join(
                        &mut ws.out_vertices,
                        &v_prev,
                        &v_curr,
                        &v_next,
                        v_prev.dist,
                        v_curr.dist,
                    );
                    self.src_vertex += 1;
                    self.prev_status = self.status;
                    self.status = Status::OutVertices;
                    self.out_vertex = 0;
                }
                Status::CloseFirst => {
                    self.status = Status::Outline2;
                    cmd = PATH_CMD_MOVE_TO;
                }
                Status::Outline2 => {
                    let ws: &mut StrokeWorkspace = self.ws.borrow_mut();
                    if self.src_vertex <= (!ws.closed) as usize {
                        self.status = Status::EndPoly2;
                        self.prev_status = Status::Stop;
                        continue;
                    }
                    self.src_vertex -= 1;
                    let v_next = *ws.src_vertices.next(self.src_vertex);
                    let v_curr = *ws.src_vertices.curr(self.src_vertex);
                    let v_prev = *ws.src_vertices.prev(self.src_vertex);
                    self.stroker.calc_join(
                        &mut ws.out_vertices,
                        &v_next,
                        &v_curr,
                        &v_prev,
                        v_curr.dist,
                        v_prev.dist,
                    );
                    self.prev_status = self.status;
                    self.status = Status::OutVertices;
                    self.out_vertex = 0;
                }
                Status::OutVertices => {
                    let ws: &StrokeWorkspace = self.ws.borrow();
                    match ws.out_vertices.get(self.out_vertex) {
                        Some(p) => {
                            self.out_vertex += 1;
                            *x = p.x;
                            *y = p.y;
                            return cmd;
                        }
                        None => self.status = self.prev_status,
                    }
                }
                Status::EndPoly1 => {
                    self.status = self.prev_status;
                    return PATH_CMD_END_POLY | PATH_FLAGS_CLOSE | PATH_FLAGS_CCW;
                }
                Status::EndPoly2 => {
                    self.status = self.prev_status;
                    return PATH_CMD_END_POLY | PATH_FLAGS_CLOSE | PATH_FLAGS_CW;
                }
                Status::Stop => {
                    return PATH_CMD_STOP;
                }
            }
        }
    }
}

impl<W: BorrowMut<StrokeWorkspace>> VertexGenerator for VcgenStroke<W> {
    fn remove_all(&mut self) {
        self.remove_all();
    }
    fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        self.add_vertex(x, y, cmd);
    }
    fn rewind(&mut self, path_id: u32) {
        self.rewind(path_id);
    }
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        self.vertex(x, y)
    }
}

// ============================================================================
// Tests
// ============================================================================
