//! Polygon rasterizer with exact anti-aliasing.
//!
//! Accepts contours (`move_to` / `line_to` / `close_polygon`, or a whole
//! [`VertexSource`]), converts their edges into cells and, once prepared,
//! exposes the result as a read-only [`CellMask`].
//!
//! ```text
//!   Empty --move_to/line_to--> Accumulating --prepare--> Ready
//!     ^                                                   |
//!     +---------------------- reset ----------------------+
//! ```
//!
//! Open contours are closed implicitly on the next `move_to` and on
//! `prepare`, so fills never leak. Geometry added to a `Ready` rasterizer is
//! rejected; call [`reset`](RasterizerScanlineAa::reset) to start over.

use crate::alpha::AlphaFn;
use crate::basics::{
    is_close, is_move_to, is_stop, is_vertex, poly_coord, VertexSource, POLY_MAX_COORD,
    POLY_SUBPIXEL_SCALE,
};
use crate::error::{Error, Result};
use crate::mask::{CellMask, Mask};
use crate::rasterizer_cells_aa::RasterizerCellsAa;

/// Lifecycle of a [`RasterizerScanlineAa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterizerState {
    Empty,
    Accumulating,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contour {
    None,
    Started,
    Open,
}

pub struct RasterizerScanlineAa {
    outline: RasterizerCellsAa,
    state: RasterizerState,
    contour: Contour,
    start_x: i32,
    start_y: i32,
    x: i32,
    y: i32,
    has_pen: bool,
}

/// Convert pixels to saturated 24.8 fixed point.
fn subpixel(v: f64) -> i32 {
    let s = v * POLY_SUBPIXEL_SCALE as f64;
    if !(s.abs() <= POLY_MAX_COORD as f64) {
        log::trace!("coordinate {} clamped to the sub-pixel range", v);
    }
    poly_coord(v)
}

impl RasterizerScanlineAa {
    pub fn new() -> Self {
        Self {
            outline: RasterizerCellsAa::new(),
            state: RasterizerState::Empty,
            contour: Contour::None,
            start_x: 0,
            start_y: 0,
            x: 0,
            y: 0,
            has_pen: false,
        }
    }

    /// Discard all geometry. Valid in any state.
    pub fn reset(&mut self) {
        self.outline.reset();
        self.state = RasterizerState::Empty;
        self.contour = Contour::None;
        self.has_pen = false;
    }

    pub fn state(&self) -> RasterizerState {
        self.state
    }

    fn ensure_building(&mut self) -> Result<()> {
        match self.state {
            RasterizerState::Ready => Err(Error::AlreadyPrepared),
            RasterizerState::Empty => {
                self.state = RasterizerState::Accumulating;
                Ok(())
            }
            RasterizerState::Accumulating => Ok(()),
        }
    }

    fn close_contour(&mut self) {
        if self.contour == Contour::Open {
            self.outline.line(self.x, self.y, self.start_x, self.start_y);
            self.x = self.start_x;
            self.y = self.start_y;
        }
        self.contour = Contour::None;
    }

    // ========================================================================
    // Path building
    // ========================================================================

    /// Start a contour at `(x, y)` in 24.8 fixed point.
    pub fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.ensure_building()?;
        self.close_contour();
        self.start_x = x;
        self.start_y = y;
        self.x = x;
        self.y = y;
        self.contour = Contour::Started;
        self.has_pen = true;
        Ok(())
    }

    /// Add an edge to `(x, y)` in 24.8 fixed point. After `close_polygon`
    /// the next edge starts from the closed contour's start point; with no
    /// pen position at all this acts as `move_to`.
    pub fn line_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.ensure_building()?;
        if self.contour == Contour::None {
            if !self.has_pen {
                return self.move_to(x, y);
            }
            self.start_x = self.x;
            self.start_y = self.y;
        }
        self.outline.line(self.x, self.y, x, y);
        self.x = x;
        self.y = y;
        self.contour = Contour::Open;
        Ok(())
    }

    pub fn move_to_d(&mut self, x: f64, y: f64) -> Result<()> {
        self.move_to(subpixel(x), subpixel(y))
    }

    pub fn line_to_d(&mut self, x: f64, y: f64) -> Result<()> {
        self.line_to(subpixel(x), subpixel(y))
    }

    /// Close the current contour with an edge back to its start.
    pub fn close_polygon(&mut self) -> Result<()> {
        self.ensure_building()?;
        self.close_contour();
        Ok(())
    }

    /// Dispatch one vertex by command. Curve commands are treated as
    /// `line_to`; flatten them with `ConvCurve` first.
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) -> Result<()> {
        if is_move_to(cmd) {
            self.move_to_d(x, y)
        } else if is_vertex(cmd) {
            self.line_to_d(x, y)
        } else if is_close(cmd) {
            self.close_polygon()
        } else {
            Ok(())
        }
    }

    /// Add every vertex of `vs`, starting from `path_id`.
    pub fn add_path<VS: VertexSource + ?Sized>(&mut self, vs: &mut VS, path_id: u32) -> Result<()> {
        if self.state == RasterizerState::Ready {
            return Err(Error::AlreadyPrepared);
        }
        let (mut x, mut y) = (0.0, 0.0);
        vs.rewind(path_id);
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                return Ok(());
            }
            self.add_vertex(x, y, cmd)?;
        }
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Close any open contour and sort the cells into rows. Idempotent.
    pub fn prepare(&mut self) {
        if self.state == RasterizerState::Ready {
            return;
        }
        self.close_contour();
        self.outline.sort_cells();
        self.state = RasterizerState::Ready;
        log::debug!(
            "rasterizer prepared: {} cells over {} rows from y = {}",
            self.outline.total_cells(),
            self.outline.height(),
            self.outline.min_y()
        );
    }

    /// Same as [`prepare`](Self::prepare).
    pub fn sort(&mut self) {
        self.prepare();
    }

    /// The coverage mask of a prepared rasterizer.
    pub fn mask(&self) -> Result<CellMask<'_>> {
        if self.state != RasterizerState::Ready {
            return Err(Error::NotPrepared);
        }
        Ok(CellMask::new(
            self.outline.sorted_cells(),
            self.outline.row_offsets(),
            self.outline.min_y(),
            self.outline.min_x(),
            self.outline.max_x(),
        ))
    }

    /// Whether pixel `(x, y)` receives non-zero alpha.
    pub fn hit_test<A: AlphaFn + ?Sized>(&self, x: i32, y: i32, alpha: &A) -> Result<bool> {
        Ok(self.mask()?.coverage(x, y, alpha) != 0)
    }
}

impl Default for RasterizerScanlineAa {
    fn default() -> Self {
        Self::new()
    }
}
