// THEORY:
// The `edge_detector` is a horizontal, neighbor-distance classifier. Each pixel is
// compared with its right neighbor using Euclidean RGB distance; a large jump marks
// the *left* pixel as an edge (black), anything else becomes background (white).
//
// Read/write ordering: the scan runs left to right and only ever writes column
// `col` after reading columns `col` and `col + 1`. Column `col + 1` is therefore
// still untouched when it is read, so every comparison uses the picture's
// original colors. The last column has no right neighbor and keeps its color.

use crate::core_modules::color::color::{Color, ColorDistance};
use crate::core_modules::error::{PictureError, Result};
use crate::core_modules::pixel_grid::Raster;

pub const EDGE_COLOR: Color = Color::BLACK;
pub const BACKGROUND_COLOR: Color = Color::WHITE;

/// Marks pixels whose color differs from their right neighbor by more than
/// `distance_threshold`.
pub fn edge_detect<R: Raster>(grid: &mut R, distance_threshold: ColorDistance) -> Result<()> {
    if distance_threshold.is_nan() || distance_threshold < 0.0 {
        return Err(PictureError::invalid(format!(
            "edge distance threshold must be non-negative, got {distance_threshold}"
        )));
    }

    let (height, width) = grid.dimensions();
    for row in 0..height {
        for col in 0..width.saturating_sub(1) {
            let left = grid.color_at(row, col)?;
            let right = grid.color_at(row, col + 1)?;
            let marked = if left.distance(&right) > distance_threshold {
                EDGE_COLOR
            } else {
                BACKGROUND_COLOR
            };
            grid.set_color_at(row, col, marked)?;
        }
    }
    Ok(())
}
