// THEORY:
// The `PixelGrid` module owns the pixels of one picture. It is a "dumb" data
// container like the rest of the low-level modules: a fixed `height x width`
// rectangle of `Color`s stored row-major in a single flattened vector.
//
// Key architectural principles:
// 1.  **Single Seam**: Every transformation reads and writes through the `Raster`
//     trait (`dimensions`, `color_at`, `set_color_at`) and never touches storage
//     directly. Any backend that implements `Raster` can be transformed.
// 2.  **Fixed Shape**: Dimensions are set at construction and never change.
// 3.  **Checked Access**: Out-of-range coordinates are reported as
//     `PictureError::OutOfBounds`. They are never clamped.
// 4.  **Value Semantics**: Colors are copied in and out. Cloning a grid is a deep
//     copy, so no pixel is ever shared between two grids.

use crate::core_modules::color::color::Color;
use crate::core_modules::error::{PictureError, Result};
use std::fmt;

/// Addressable 2D color storage, indexed by `(row, col)`.
pub trait Raster {
    /// Returns `(height, width)`.
    fn dimensions(&self) -> (usize, usize);

    fn color_at(&self, row: usize, col: usize) -> Result<Color>;

    fn set_color_at(&mut self, row: usize, col: usize, color: Color) -> Result<()>;

    fn height(&self) -> usize {
        self.dimensions().0
    }

    fn width(&self) -> usize {
        self.dimensions().1
    }

    fn contains(&self, row: usize, col: usize) -> bool {
        let (height, width) = self.dimensions();
        row < height && col < width
    }

    /// Replaces every color with `f(old)`, visiting pixels row-major.
    fn map_colors<F>(&mut self, mut f: F) -> Result<()>
    where
        Self: Sized,
        F: FnMut(Color) -> Color,
    {
        let (height, width) = self.dimensions();
        for row in 0..height {
            for col in 0..width {
                let color = self.color_at(row, col)?;
                self.set_color_at(row, col, f(color))?;
            }
        }
        Ok(())
    }
}

/// A fixed-size, row-major grid of RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    /// The number of rows.
    height: usize,
    /// The number of columns.
    width: usize,
    /// A flattened, row-major vector of `height * width` colors.
    pixels: Vec<Color>,
}

impl PixelGrid {
    /// Creates a blank white grid.
    pub fn new(height: usize, width: usize) -> Result<Self> {
        Self::filled(height, width, Color::WHITE)
    }

    pub fn filled(height: usize, width: usize, color: Color) -> Result<Self> {
        let len = Self::checked_len(height, width)?;
        Ok(Self {
            height,
            width,
            pixels: vec![color; len],
        })
    }

    /// Builds a grid from row-major colors. `colors.len()` must equal `height * width`.
    pub fn from_colors(height: usize, width: usize, colors: Vec<Color>) -> Result<Self> {
        let len = Self::checked_len(height, width)?;
        if colors.len() != len {
            return Err(PictureError::invalid(format!(
                "expected {len} colors for a {height}x{width} grid, got {}",
                colors.len()
            )));
        }
        Ok(Self {
            height,
            width,
            pixels: colors,
        })
    }

    fn checked_len(height: usize, width: usize) -> Result<usize> {
        if height == 0 || width == 0 {
            return Err(PictureError::invalid(format!(
                "grid dimensions must be non-zero, got {height}x{width}"
            )));
        }
        height
            .checked_mul(width)
            .ok_or_else(|| PictureError::invalid(format!("grid size {height}x{width} overflows")))
    }

    fn index_of(&self, row: usize, col: usize) -> Result<usize> {
        if !self.contains(row, col) {
            return Err(PictureError::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(row * self.width + col)
    }

    /// Iterates `(row, col, color)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        let width = self.width;
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, color)| (i / width, i % width, *color))
    }

    /// Row-major view of all colors.
    pub fn colors(&self) -> &[Color] {
        &self.pixels
    }
}

impl Raster for PixelGrid {
    fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn color_at(&self, row: usize, col: usize) -> Result<Color> {
        let index = self.index_of(row, col)?;
        Ok(self.pixels[index])
    }

    fn set_color_at(&mut self, row: usize, col: usize, color: Color) -> Result<()> {
        let index = self.index_of(row, col)?;
        self.pixels[index] = color;
        Ok(())
    }
}

impl fmt::Display for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixelGrid height {} width {}", self.height, self.width)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a grid where every pixel has a distinct color derived from its position.
    pub(crate) fn distinct_grid(height: usize, width: usize) -> PixelGrid {
        let colors = (0..height * width)
            .map(|i| Color::new(i as u8, (i * 7 % 256) as u8, (255 - i % 256) as u8))
            .collect();
        PixelGrid::from_colors(height, width, colors).unwrap()
    }

    #[test]
    fn new_grid_is_white_with_fixed_dimensions() {
        let grid = PixelGrid::new(3, 5).unwrap();
        assert_eq!(grid.dimensions(), (3, 5));
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 5);
        assert!(grid.pixels().all(|(_, _, c)| c == Color::WHITE));
        assert_eq!(grid.pixels().count(), 15);
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(PixelGrid::new(0, 4), Err(PictureError::InvalidParameter(_))));
        assert!(matches!(PixelGrid::new(4, 0), Err(PictureError::InvalidParameter(_))));
    }

    #[test]
    fn from_colors_checks_length() {
        let err = PixelGrid::from_colors(2, 2, vec![Color::BLACK; 3]).unwrap_err();
        assert!(matches!(err, PictureError::InvalidParameter(_)));
    }

    #[test]
    fn get_and_set_round_trip() {
        let mut grid = PixelGrid::new(2, 3).unwrap();
        grid.set_color_at(1, 2, Color::PURPLE).unwrap();
        assert_eq!(grid.color_at(1, 2).unwrap(), Color::PURPLE);
        assert_eq!(grid.color_at(0, 0).unwrap(), Color::WHITE);
        assert_eq!(grid.colors()[5], Color::PURPLE);
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let mut grid = PixelGrid::new(2, 3).unwrap();
        assert_eq!(
            grid.color_at(2, 0),
            Err(PictureError::OutOfBounds { row: 2, col: 0, height: 2, width: 3 })
        );
        assert_eq!(
            grid.set_color_at(0, 3, Color::BLACK),
            Err(PictureError::OutOfBounds { row: 0, col: 3, height: 2, width: 3 })
        );
        assert!(grid.pixels().all(|(_, _, c)| c == Color::WHITE));
    }

    #[test]
    fn contains_agrees_with_checked_access() {
        let grid = PixelGrid::new(2, 3).unwrap();
        for row in 0..4 {
            for col in 0..5 {
                assert_eq!(grid.contains(row, col), grid.color_at(row, col).is_ok());
            }
        }
        assert!(grid.contains(1, 2));
        assert!(!grid.contains(usize::MAX, 0));
    }

    #[test]
    fn pixels_iterate_row_major() {
        let grid = distinct_grid(2, 3);
        let coords: Vec<_> = grid.pixels().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let original = distinct_grid(2, 2);
        let mut copy = original.clone();
        copy.set_color_at(0, 0, Color::BLACK).unwrap();
        assert_ne!(original.color_at(0, 0).unwrap(), Color::BLACK);
    }

    #[test]
    fn display_reports_dimensions() {
        let grid = PixelGrid::new(480, 640).unwrap();
        assert_eq!(grid.to_string(), "PixelGrid height 480 width 640");
    }
}
