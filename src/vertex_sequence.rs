//! Distance-tagged vertex storage used by the stroke generator.
//!
//! Every stored vertex carries the length of the segment that starts at it.
//! Coincident neighbours are dropped lazily as new points arrive, so the
//! offset math never divides by a zero-length edge.

use crate::math::{calc_distance, VERTEX_DIST_EPSILON};

// ============================================================================
// VertexDist
// ============================================================================

/// A vertex with coordinates and the distance to the next vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexDist {
    pub x: f64,
    pub y: f64,
    pub dist: f64,
}

impl VertexDist {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, dist: 0.0 }
    }

    /// Calculate distance to `val` and store it. Returns `true` if the
    /// points are not coincident (distance > VERTEX_DIST_EPSILON).
    /// If coincident, sets dist to `1.0 / VERTEX_DIST_EPSILON`.
    pub fn calc_dist(&mut self, val: &VertexDist) -> bool {
        self.dist = calc_distance(self.x, self.y, val.x, val.y);
        let ret = self.dist > VERTEX_DIST_EPSILON;
        if !ret {
            self.dist = 1.0 / VERTEX_DIST_EPSILON;
        }
        ret
    }
}

// ============================================================================
// VertexSequence
// ============================================================================

/// A sequence of vertices that filters coincident points.
///
/// When a vertex is added, the distance from its predecessor to the current
/// last vertex is computed; if those two coincide the last one is replaced.
#[derive(Debug, Clone, Default)]
pub struct VertexSequence {
    vertices: Vec<VertexDist>,
}

impl VertexSequence {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn add(&mut self, val: VertexDist) {
        let len = self.vertices.len();
        if len > 1 {
            let last = self.vertices[len - 1];
            if !self.vertices[len - 2].calc_dist(&last) {
                self.vertices.pop();
            }
        }
        self.vertices.push(val);
    }

    /// Replace the last vertex (or add one to an empty sequence).
    pub fn modify_last(&mut self, val: VertexDist) {
        self.vertices.pop();
        self.add(val);
    }

    /// Finish accumulation: drop trailing coincident vertices and, when
    /// `closed`, a last vertex that coincides with the first. On return
    /// every vertex's `dist` is the length of its outgoing edge (the last
    /// vertex's edge leads back to the first for closed sequences).
    pub fn close(&mut self, closed: bool) {
        while self.vertices.len() > 1 {
            let len = self.vertices.len();
            let last = self.vertices[len - 1];
            if self.vertices[len - 2].calc_dist(&last) {
                break;
            }
            self.vertices.pop();
            self.modify_last(last);
        }

        if closed {
            while self.vertices.len() > 1 {
                let len = self.vertices.len();
                let first = self.vertices[0];
                if self.vertices[len - 1].calc_dist(&first) {
                    break;
                }
                self.vertices.pop();
            }
        }
    }

    pub fn remove_all(&mut self) {
        self.vertices.clear();
    }

    /// Total centerline length of the open polyline.
    pub fn length(&self) -> f64 {
        match self.vertices.len() {
            0 | 1 => 0.0,
            n => self.vertices[..n - 1].iter().map(|v| v.dist).sum(),
        }
    }

    pub fn as_slice(&self) -> &[VertexDist] {
        &self.vertices
    }

    /// Vertex `i`.
    #[inline]
    pub fn curr(&self, i: usize) -> &VertexDist {
        &self.vertices[i]
    }

    /// Vertex before `i`, wrapping around.
    #[inline]
    pub fn prev(&self, i: usize) -> &VertexDist {
        let n = self.vertices.len();
        &self.vertices[(i + n - 1) % n]
    }

    /// Vertex after `i`, wrapping around.
    #[inline]
    pub fn next(&self, i: usize) -> &VertexDist {
        &self.vertices[(i + 1) % self.vertices.len()]
    }
}

impl core::ops::Index<usize> for VertexSequence {
    type Output = VertexDist;

    fn index(&self, i: usize) -> &VertexDist {
        &self.vertices[i]
    }
}

// ============================================================================
// shorten_path
// ============================================================================

/// Trim `s` units of length from both ends of an open polyline.
///
/// Expects a sequence already passed through [`VertexSequence::close`].
/// Closed sequences have no ends and are left alone. When the trims meet
/// (`2 * s >= length`) the sequence is emptied.
pub fn shorten_path(vs: &mut VertexSequence, s: f64, closed: bool) {
    if closed || s <= 0.0 || vs.size() < 2 {
        return;
    }
    if 2.0 * s >= vs.length() {
        vs.remove_all();
        return;
    }

    let v = &mut vs.vertices;

    // Tail.
    let mut d = s;
    while v.len() > 2 && v[v.len() - 2].dist <= d {
        d -= v[v.len() - 2].dist;
        v.pop();
    }
    let n = v.len();
    let prev = v[n - 2];
    let k = (prev.dist - d) / prev.dist;
    let last = &mut v[n - 1];
    last.x = prev.x + (last.x - prev.x) * k;
    last.y = prev.y + (last.y - prev.y) * k;
    let last = v[n - 1];
    v[n - 2].calc_dist(&last);

    // Head.
    let mut d = s;
    let mut skip = 0;
    while v.len() - skip > 2 && v[skip].dist <= d {
        d -= v[skip].dist;
        skip += 1;
    }
    v.drain(..skip);
    let next = v[1];
    let k = d / v[0].dist;
    let first = &mut v[0];
    first.x += (next.x - first.x) * k;
    first.y += (next.y - first.y) * k;
    v[0].calc_dist(&next);

    vs.close(false);
}

// ============================================================================
// Tests
// ============================================================================
