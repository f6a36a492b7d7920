//! Coverage masks.
//!
//! A [`Mask`] is the read-only result of rasterization: a contiguous band
//! of rows, each holding cells sorted by x. Rows are turned into runs on
//! demand by sweeping their cells through an alpha function into a
//! caller-provided [`ScanlineU8`].

use crate::alpha::{cell_raw, span_raw, AlphaFn};
use crate::error::{Error, Result};
use crate::rasterizer_cells_aa::Cell;
use crate::scanline_u::{Runs, ScanlineU8};

pub trait Mask {
    /// First row of the mask.
    fn min_y(&self) -> i32;

    /// Number of rows. Zero for an empty mask.
    fn height(&self) -> u32;

    /// Leftmost pixel any row may cover.
    fn min_x(&self) -> i32;

    /// Rightmost pixel any row may cover (inclusive).
    fn max_x(&self) -> i32;

    /// Cells of row `y` in strictly increasing x.
    fn cells(&self, y: i32) -> Result<&[Cell]>;

    /// Sweep row `y` into `sl` and return its runs.
    fn row<'s, A: AlphaFn + ?Sized>(
        &self,
        y: i32,
        alpha: &A,
        sl: &'s mut ScanlineU8,
    ) -> Result<Runs<'s>> {
        let cells = self.cells(y)?;
        sweep_cells(y, cells, alpha, sl);
        Ok(sl.runs())
    }

    /// Alpha of the single pixel `(x, y)`. Pixels outside the mask are 0.
    fn coverage<A: AlphaFn + ?Sized>(&self, x: i32, y: i32, alpha: &A) -> u8 {
        let Ok(cells) = self.cells(y) else {
            return 0;
        };
        let mut cover = 0i32;
        for cell in cells {
            if cell.x > x {
                break;
            }
            cover += cell.cover;
            if cell.x == x {
                return alpha.alpha(cell_raw(cover, cell.area));
            }
        }
        alpha.alpha(span_raw(cover))
    }

    /// Rows of the mask as a range.
    fn rows(&self) -> std::ops::Range<i32> {
        self.min_y()..self.min_y() + self.height() as i32
    }
}

/// Turn one row of sorted cells into runs.
///
/// A cell with area is a partial pixel; the pixels up to the next cell are
/// covered by the running cover alone. Zero alpha is never emitted.
pub fn sweep_cells<A: AlphaFn + ?Sized>(y: i32, cells: &[Cell], alpha: &A, sl: &mut ScanlineU8) {
    sl.reset_spans();
    let mut cover = 0i32;
    let mut iter = cells.iter().peekable();
    while let Some(cell) = iter.next() {
        cover += cell.cover;
        let mut x = cell.x;
        if cell.area != 0 {
            let a = alpha.alpha(cell_raw(cover, cell.area));
            if a != 0 {
                sl.add_cell(x, a);
            }
            x += 1;
        }
        if let Some(next) = iter.peek() {
            if next.x > x {
                let a = alpha.alpha(span_raw(cover));
                if a != 0 {
                    sl.add_span(x, (next.x - x) as u32, a);
                }
            }
        }
    }
    sl.finalize(y);
}

/// Mask view over a prepared rasterizer's cells.
#[derive(Debug, Clone, Copy)]
pub struct CellMask<'a> {
    cells: &'a [Cell],
    row_offsets: &'a [u32],
    min_y: i32,
    min_x: i32,
    max_x: i32,
}

impl<'a> CellMask<'a> {
    pub(crate) fn new(
        cells: &'a [Cell],
        row_offsets: &'a [u32],
        min_y: i32,
        min_x: i32,
        max_x: i32,
    ) -> Self {
        Self {
            cells,
            row_offsets,
            min_y,
            min_x,
            max_x,
        }
    }

    /// An empty mask: no rows, no cells.
    pub fn empty() -> Self {
        Self::new(&[], &[], 0, 0, -1)
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }
}

impl Mask for CellMask<'_> {
    fn min_y(&self) -> i32 {
        self.min_y
    }

    fn height(&self) -> u32 {
        self.row_offsets.len().saturating_sub(1) as u32
    }

    fn min_x(&self) -> i32 {
        self.min_x
    }

    fn max_x(&self) -> i32 {
        self.max_x
    }

    fn cells(&self, y: i32) -> Result<&[Cell]> {
        let i = y as i64 - self.min_y as i64;
        if i < 0 || i >= self.height() as i64 {
            return Err(Error::RowOutOfRange {
                y,
                min_y: self.min_y,
                height: self.height(),
            });
        }
        let i = i as usize;
        Ok(&self.cells[self.row_offsets[i] as usize..self.row_offsets[i + 1] as usize])
    }
}
