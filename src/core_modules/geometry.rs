// THEORY:
// The `geometry` module moves colors between positions: whole-image mirrors,
// a windowed mirror around an arbitrary pivot column, and rectangular copies.
//
// Key architectural principles:
// 1.  **Source of Truth**: Every mirror names the half it copies *from*. Left-to-
//     right and right-to-left are not inverses; they keep different halves. For
//     odd sizes the center row or column is never written.
// 2.  **Validate, then Write**: Window and region parameters are checked against
//     the grids before the first pixel is touched. No partial writes on bad input.
// 3.  **Explicit Overlap Order**: `copy_region_within` reads and writes the same grid
//     in a single row-major pass. A read sees any write made earlier in the scan;
//     this is the observable behavior and is not replaced by a buffered copy.

use crate::core_modules::error::{PictureError, Result};
use crate::core_modules::pixel_grid::Raster;

/// A windowed mirror: rows `[row_start, row_end)`, columns `[col_start, pivot_col)`
/// are reflected onto `2 * pivot_col - col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorWindow {
    pub pivot_col: usize,
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
}

/// The temple facade window: pivot 276, rows 27..97, starting at column 13.
pub const TEMPLE_WINDOW: MirrorWindow = MirrorWindow {
    pivot_col: 276,
    row_start: 27,
    row_end: 97,
    col_start: 13,
};

/// Half-open rectangle `[row_start, row_end) x [col_start, col_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl Region {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    pub fn height(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    pub fn width(&self) -> usize {
        self.col_end.saturating_sub(self.col_start)
    }
}

/// Copies the left half onto the right half of every row.
pub fn mirror_vertical<R: Raster>(grid: &mut R) -> Result<()> {
    let (height, width) = grid.dimensions();
    for row in 0..height {
        for col in 0..width / 2 {
            let left = grid.color_at(row, col)?;
            grid.set_color_at(row, width - 1 - col, left)?;
        }
    }
    Ok(())
}

/// Copies the right half onto the left half of every row.
pub fn mirror_vertical_right_to_left<R: Raster>(grid: &mut R) -> Result<()> {
    let (height, width) = grid.dimensions();
    for row in 0..height {
        for col in 0..width / 2 {
            let right = grid.color_at(row, width - 1 - col)?;
            grid.set_color_at(row, col, right)?;
        }
    }
    Ok(())
}

/// Copies the top half onto the bottom half of every column.
pub fn mirror_horizontal<R: Raster>(grid: &mut R) -> Result<()> {
    let (height, width) = grid.dimensions();
    for row in 0..height / 2 {
        for col in 0..width {
            let top = grid.color_at(row, col)?;
            grid.set_color_at(height - 1 - row, col, top)?;
        }
    }
    Ok(())
}

/// Copies the bottom half onto the top half of every column.
pub fn mirror_horizontal_bottom_to_top<R: Raster>(grid: &mut R) -> Result<()> {
    let (height, width) = grid.dimensions();
    for row in 0..height / 2 {
        for col in 0..width {
            let bottom = grid.color_at(height - 1 - row, col)?;
            grid.set_color_at(row, col, bottom)?;
        }
    }
    Ok(())
}

/// Reflects the window's left part across `pivot_col`.
pub fn mirror_region<R: Raster>(grid: &mut R, window: &MirrorWindow) -> Result<()> {
    let (height, width) = grid.dimensions();
    let MirrorWindow {
        pivot_col,
        row_start,
        row_end,
        col_start,
    } = *window;

    if row_start > row_end || row_end > height {
        return Err(PictureError::invalid(format!(
            "mirror rows {row_start}..{row_end} do not fit a grid of height {height}"
        )));
    }
    if col_start > pivot_col {
        return Err(PictureError::invalid(format!(
            "mirror start column {col_start} is right of pivot {pivot_col}"
        )));
    }
    if col_start < pivot_col {
        let furthest = pivot_col.checked_mul(2).map(|double| double - col_start);
        if furthest.is_none_or(|col| col >= width) {
            return Err(PictureError::invalid(format!(
                "mirror around pivot {pivot_col} from column {col_start} \
                 does not fit a grid of width {width}"
            )));
        }
    }

    for row in row_start..row_end {
        for col in col_start..pivot_col {
            let left = grid.color_at(row, col)?;
            grid.set_color_at(row, 2 * pivot_col - col, left)?;
        }
    }
    Ok(())
}

fn check_region(region: &Region, (height, width): (usize, usize), what: &str) -> Result<()> {
    if region.row_start > region.row_end || region.col_start > region.col_end {
        return Err(PictureError::invalid(format!("{what} region {region:?} is inverted")));
    }
    if region.row_end > height || region.col_end > width {
        return Err(PictureError::invalid(format!(
            "{what} region {region:?} exceeds a {height}x{width} grid"
        )));
    }
    Ok(())
}

fn check_copy(
    region: &Region,
    source: (usize, usize),
    dest: (usize, usize),
    dest_row: usize,
    dest_col: usize,
) -> Result<()> {
    check_region(region, source, "source")?;
    let target = Region::new(
        dest_row,
        dest_row.saturating_add(region.height()),
        dest_col,
        dest_col.saturating_add(region.width()),
    );
    check_region(&target, dest, "destination")
}

/// Visits every cell of `region` in row-major order as `(source, destination)`
/// coordinate pairs, the destination anchored at `(dest_row, dest_col)`.
fn for_each_copy_cell<F>(
    region: &Region,
    dest_row: usize,
    dest_col: usize,
    mut step: F,
) -> Result<()>
where
    F: FnMut((usize, usize), (usize, usize)) -> Result<()>,
{
    for (r, row) in (region.row_start..region.row_end).enumerate() {
        for (c, col) in (region.col_start..region.col_end).enumerate() {
            step((row, col), (dest_row + r, dest_col + c))?;
        }
    }
    Ok(())
}

/// Copies `region` of `source` into `dest` with its top-left corner at `(dest_row, dest_col)`.
pub fn copy_region<S: Raster, D: Raster>(
    source: &S,
    dest: &mut D,
    region: &Region,
    dest_row: usize,
    dest_col: usize,
) -> Result<()> {
    check_copy(region, source.dimensions(), dest.dimensions(), dest_row, dest_col)?;
    for_each_copy_cell(region, dest_row, dest_col, |(row, col), (to_row, to_col)| {
        dest.set_color_at(to_row, to_col, source.color_at(row, col)?)
    })
}

/// Same-grid variant of [`copy_region`]. Overlapping regions follow the sequential
/// row-major overwrite order: a source pixel already overwritten earlier in the
/// scan is read with its new color.
pub fn copy_region_within<R: Raster>(
    grid: &mut R,
    region: &Region,
    dest_row: usize,
    dest_col: usize,
) -> Result<()> {
    let dims = grid.dimensions();
    check_copy(region, dims, dims, dest_row, dest_col)?;
    for_each_copy_cell(region, dest_row, dest_col, |(row, col), (to_row, to_col)| {
        let color = grid.color_at(row, col)?;
        grid.set_color_at(to_row, to_col, color)
    })
}
