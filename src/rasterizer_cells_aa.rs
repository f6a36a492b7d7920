//! Edge-to-cell conversion engine.
//!
//! Walks line segments given in 24.8 fixed point and accumulates, per
//! touched pixel, the signed vertical extent (`cover`) and the doubled
//! signed area to the left of the edge within the pixel (`area`). The walk
//! is an exact integer DDA that carries remainders, so no rounding bias
//! builds up along long edges.
//!
//! Cells are collected into one flat arena. [`RasterizerCellsAa::sort_cells`]
//! counting-sorts them by row, sorts each row by x and merges duplicates,
//! leaving a per-row range table.

use crate::basics::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

/// One pixel's accumulated coverage within a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub cover: i32,
    pub area: i32,
}

/// Cell as accumulated during the edge walk, before rows are known.
#[derive(Debug, Clone, Copy)]
struct AccCell {
    x: i32,
    y: i32,
    cover: i32,
    area: i32,
}

impl AccCell {
    const EMPTY: AccCell = AccCell {
        x: i32::MAX,
        y: i32::MAX,
        cover: 0,
        area: 0,
    };

    #[inline]
    fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}

/// Edges with a horizontal extent beyond this are bisected so the
/// per-row DDA terms stay inside `i32`.
const DX_LIMIT: i64 = 16384 << POLY_SUBPIXEL_SHIFT;

const SCALE: i32 = POLY_SUBPIXEL_SCALE as i32;
const MASK: i32 = POLY_SUBPIXEL_MASK as i32;

pub struct RasterizerCellsAa {
    cells: Vec<AccCell>,
    curr_cell: AccCell,
    sorted_cells: Vec<Cell>,
    // `row_offsets[i]..row_offsets[i + 1]` indexes `sorted_cells` for row `min_y + i`.
    row_offsets: Vec<u32>,
    row_fill: Vec<u32>,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    sorted: bool,
}

impl RasterizerCellsAa {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            curr_cell: AccCell::EMPTY,
            sorted_cells: Vec::new(),
            row_offsets: Vec::new(),
            row_fill: Vec::new(),
            min_x: 0,
            max_x: -1,
            min_y: 0,
            sorted: false,
        }
    }

    /// Discard all cells, keeping allocations.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.sorted_cells.clear();
        self.row_offsets.clear();
        self.curr_cell = AccCell::EMPTY;
        self.min_x = 0;
        self.max_x = -1;
        self.min_y = 0;
        self.sorted = false;
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Number of cells after sorting and merging.
    pub fn total_cells(&self) -> usize {
        self.sorted_cells.len()
    }

    /// First row holding cells. Meaningful once sorted.
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Number of rows between the first and last row holding cells.
    pub fn height(&self) -> u32 {
        self.row_offsets.len().saturating_sub(1) as u32
    }

    /// Leftmost cell column. Greater than `max_x` when there are no cells.
    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn sorted_cells(&self) -> &[Cell] {
        &self.sorted_cells
    }

    pub fn row_offsets(&self) -> &[u32] {
        &self.row_offsets
    }

    // ========================================================================
    // Edge walk
    // ========================================================================

    #[inline]
    fn add_curr_cell(&mut self) {
        if self.curr_cell.area | self.curr_cell.cover != 0 {
            self.cells.push(self.curr_cell);
        }
    }

    /// Make `(x, y)` the current cell. Contributions to the same cell in a
    /// row of calls merge in place.
    #[inline]
    fn set_curr_cell(&mut self, x: i32, y: i32) {
        if !self.curr_cell.is_at(x, y) {
            self.add_curr_cell();
            self.curr_cell = AccCell {
                x,
                y,
                cover: 0,
                area: 0,
            };
        }
    }

    #[inline]
    fn accumulate(&mut self, cover: i32, area: i32) {
        self.curr_cell.cover += cover;
        self.curr_cell.area += area;
    }

    /// Walk the part of an edge inside row `ey`. `x1`/`x2` are 24.8
    /// coordinates, `y1`/`y2` the sub-pixel offsets within the row.
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & MASK;
        let fx2 = x2 & MASK;

        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        if ex1 == ex2 {
            let delta = y2 - y1;
            self.accumulate(delta, (fx1 + fx2) * delta);
            return;
        }

        let mut dx = x2 as i64 - x1 as i64;
        let (mut p, first, incr) = if dx < 0 {
            dx = -dx;
            (fx1 as i64 * (y2 - y1) as i64, 0, -1)
        } else {
            ((SCALE - fx1) as i64 * (y2 - y1) as i64, SCALE, 1)
        };

        let mut delta = p.div_euclid(dx) as i32;
        let mut modulo = p.rem_euclid(dx);

        self.accumulate(delta, (fx1 + first) * delta);

        let mut ex = ex1 + incr;
        self.set_curr_cell(ex, ey);
        let mut y = y1 + delta;

        if ex != ex2 {
            p = SCALE as i64 * (y2 - y + delta) as i64;
            let lift = p.div_euclid(dx) as i32;
            let rem = p.rem_euclid(dx);
            modulo -= dx;

            while ex != ex2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }
                self.accumulate(delta, SCALE * delta);
                y += delta;
                ex += incr;
                self.set_curr_cell(ex, ey);
            }
        }

        delta = y2 - y;
        self.accumulate(delta, (fx2 + SCALE - first) * delta);
    }

    /// Add an edge in 24.8 fixed-point coordinates.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = x2 as i64 - x1 as i64;
        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = ((x1 as i64 + x2 as i64) >> 1) as i32;
            let cy = ((y1 as i64 + y2 as i64) >> 1) as i32;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }

        let dy = y2 as i64 - y1 as i64;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let mut ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & MASK;
        let fy2 = y2 & MASK;

        self.set_curr_cell(ex1, ey1);

        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        let (first, incr) = if dy < 0 { (0, -1) } else { (SCALE, 1) };

        // Vertical edge: one cell per row, no horizontal walk.
        if dx == 0 {
            let two_fx = (x1 & MASK) << 1;

            let mut delta = first - fy1;
            self.accumulate(delta, two_fx * delta);
            ey1 += incr;
            self.set_curr_cell(ex1, ey1);

            delta = first + first - SCALE;
            while ey1 != ey2 {
                self.accumulate(delta, two_fx * delta);
                ey1 += incr;
                self.set_curr_cell(ex1, ey1);
            }

            delta = fy2 - SCALE + first;
            self.accumulate(delta, two_fx * delta);
            return;
        }

        let dy_abs = dy.abs();
        let mut p = if dy < 0 {
            fy1 as i64 * dx
        } else {
            (SCALE - fy1) as i64 * dx
        };

        let mut delta = p.div_euclid(dy_abs) as i32;
        let mut modulo = p.rem_euclid(dy_abs);

        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);

        ey1 += incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            p = SCALE as i64 * dx;
            let lift = p.div_euclid(dy_abs) as i32;
            let rem = p.rem_euclid(dy_abs);
            modulo -= dy_abs;

            while ey1 != ey2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy_abs;
                    delta += 1;
                }

                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, SCALE - first, x_to, first);
                x_from = x_to;

                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, SCALE - first, x2, fy2);
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Group cells by row, order each row by x and merge cells sharing a
    /// pixel. Idempotent until the next [`reset`](Self::reset).
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.sorted = true;

        self.add_curr_cell();
        self.curr_cell = AccCell::EMPTY;

        self.sorted_cells.clear();
        self.row_offsets.clear();
        self.min_x = 0;
        self.max_x = -1;

        let Some((min_y, max_y)) = self
            .cells
            .iter()
            .map(|c| (c.y, c.y))
            .reduce(|(lo, hi), (y, _)| (lo.min(y), hi.max(y)))
        else {
            self.min_y = 0;
            return;
        };
        self.min_y = min_y;
        let rows = (max_y as i64 - min_y as i64 + 1) as usize;

        // Histogram of cells per row, turned into start offsets.
        self.row_offsets.resize(rows + 1, 0);
        for cell in &self.cells {
            self.row_offsets[(cell.y - min_y) as usize + 1] += 1;
        }
        for i in 1..=rows {
            self.row_offsets[i] += self.row_offsets[i - 1];
        }

        self.row_fill.clear();
        self.row_fill.extend_from_slice(&self.row_offsets[..rows]);
        self.sorted_cells.resize(self.cells.len(), Cell::default());
        for cell in &self.cells {
            let slot = &mut self.row_fill[(cell.y - min_y) as usize];
            self.sorted_cells[*slot as usize] = Cell {
                x: cell.x,
                cover: cell.cover,
                area: cell.area,
            };
            *slot += 1;
        }

        // Sort every row by x and compact it in place, merging equal x.
        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        let mut write = 0usize;
        let mut read_start = self.row_offsets[0] as usize;
        for row in 0..rows {
            let read_end = self.row_offsets[row + 1] as usize;
            self.row_offsets[row] = write as u32;

            let cells = &mut self.sorted_cells[read_start..read_end];
            cells.sort_unstable_by_key(|c| c.x);

            let mut i = read_start;
            while i < read_end {
                let mut merged = self.sorted_cells[i];
                i += 1;
                while i < read_end && self.sorted_cells[i].x == merged.x {
                    merged.cover += self.sorted_cells[i].cover;
                    merged.area += self.sorted_cells[i].area;
                    i += 1;
                }
                if merged.cover | merged.area != 0 {
                    min_x = min_x.min(merged.x);
                    max_x = max_x.max(merged.x);
                    self.sorted_cells[write] = merged;
                    write += 1;
                }
            }
            read_start = read_end;
        }
        self.row_offsets[rows] = write as u32;
        self.sorted_cells.truncate(write);
        self.cells.clear();

        if write > 0 {
            self.min_x = min_x;
            self.max_x = max_x;
        } else {
            // Everything cancelled out.
            self.row_offsets.clear();
            self.min_y = 0;
        }
    }

    /// Cells of row `y` in increasing x. Empty outside the sorted rows.
    pub fn row(&self, y: i32) -> &[Cell] {
        let i = y as i64 - self.min_y as i64;
        if i < 0 || i >= self.height() as i64 {
            return &[];
        }
        let i = i as usize;
        &self.sorted_cells[self.row_offsets[i] as usize..self.row_offsets[i + 1] as usize]
    }
}

impl Default for RasterizerCellsAa {
    fn default() -> Self {
        Self::new()
    }
}
