// THEORY:
// Pointwise transforms are single-pass, per-pixel maps. Each new color depends only
// on that pixel's own previous color, so visit order never changes the result and
// there is no cross-pixel state. They are the building blocks the posterizer and
// the pipeline compose.

use crate::core_modules::color::color::Color;
use crate::core_modules::error::Result;
use crate::core_modules::pixel_grid::Raster;

/// Sets the blue channel of every pixel to 0.
pub fn zero_blue<R: Raster>(grid: &mut R) -> Result<()> {
    grid.map_colors(|c| Color { blue: 0, ..c })
}

/// Keeps only the blue channel: red and green become 0.
pub fn keep_only_blue<R: Raster>(grid: &mut R) -> Result<()> {
    grid.map_colors(|c| Color::new(0, 0, c.blue))
}

/// Replaces every channel value `v` with `255 - v`.
pub fn negate<R: Raster>(grid: &mut R) -> Result<()> {
    grid.map_colors(|c| Color::new(255 - c.red, 255 - c.green, 255 - c.blue))
}

/// Sets all three channels to the truncated channel average.
pub fn grayscale<R: Raster>(grid: &mut R) -> Result<()> {
    grid.map_colors(|c| Color::gray(c.average()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::error::PictureError;
    use crate::core_modules::geometry;
    use crate::core_modules::pixel_grid::PixelGrid;
    use crate::core_modules::pixel_grid::tests::distinct_grid;
    use rstest::rstest;

    type WholeImageOp = fn(&mut Overstated) -> Result<()>;

    /// A raster that reports `extra_rows` more rows than its storage holds.
    struct Overstated {
        grid: PixelGrid,
        extra_rows: usize,
    }

    impl Raster for Overstated {
        fn dimensions(&self) -> (usize, usize) {
            (self.grid.height() + self.extra_rows, self.grid.width())
        }

        fn color_at(&self, row: usize, col: usize) -> Result<Color> {
            self.grid.color_at(row, col)
        }

        fn set_color_at(&mut self, row: usize, col: usize, color: Color) -> Result<()> {
            self.grid.set_color_at(row, col, color)
        }
    }

    fn single(color: Color) -> PixelGrid {
        PixelGrid::filled(1, 1, color).unwrap()
    }

    #[test]
    fn zero_blue_keeps_red_and_green() {
        let mut grid = single(Color::new(10, 20, 30));
        zero_blue(&mut grid).unwrap();
        assert_eq!(grid.color_at(0, 0).unwrap(), Color::new(10, 20, 0));
    }

    #[test]
    fn keep_only_blue_clears_red_and_green() {
        let mut grid = single(Color::new(10, 20, 30));
        keep_only_blue(&mut grid).unwrap();
        assert_eq!(grid.color_at(0, 0).unwrap(), Color::new(0, 0, 30));
    }

    #[test]
    fn keep_only_blue_then_zero_blue_is_black() {
        let mut grid = distinct_grid(4, 5);
        keep_only_blue(&mut grid).unwrap();
        zero_blue(&mut grid).unwrap();
        assert!(grid.pixels().all(|(_, _, c)| c == Color::BLACK));
    }

    #[test]
    fn negate_inverts_each_channel() {
        let mut grid = single(Color::new(0, 100, 255));
        negate(&mut grid).unwrap();
        assert_eq!(grid.color_at(0, 0).unwrap(), Color::new(255, 155, 0));
    }

    #[test]
    fn negate_twice_is_identity() {
        let original = distinct_grid(5, 7);
        let mut grid = original.clone();
        negate(&mut grid).unwrap();
        assert_ne!(grid, original);
        negate(&mut grid).unwrap();
        assert_eq!(grid, original);
    }

    #[test]
    fn grayscale_truncates_average() {
        let mut grid = single(Color::new(100, 100, 102));
        grayscale(&mut grid).unwrap();
        assert_eq!(grid.color_at(0, 0).unwrap(), Color::gray(100));
    }

    #[test]
    fn grayscale_is_idempotent() {
        let mut once = distinct_grid(6, 6);
        grayscale(&mut once).unwrap();
        let mut twice = once.clone();
        grayscale(&mut twice).unwrap();
        assert_eq!(once, twice);
        assert!(once.pixels().all(|(_, _, c)| c.red == c.green && c.green == c.blue));
    }

    #[rstest]
    #[case::zero_blue(zero_blue)]
    #[case::keep_only_blue(keep_only_blue)]
    #[case::negate(negate)]
    #[case::grayscale(grayscale)]
    #[case::mirror_vertical(geometry::mirror_vertical)]
    #[case::mirror_vertical_right_to_left(geometry::mirror_vertical_right_to_left)]
    #[case::mirror_horizontal(geometry::mirror_horizontal)]
    #[case::mirror_horizontal_bottom_to_top(geometry::mirror_horizontal_bottom_to_top)]
    fn whole_image_ops_fail_only_through_the_raster_seam(#[case] op: WholeImageOp) {
        let mut honest = Overstated { grid: distinct_grid(3, 4), extra_rows: 0 };
        assert_eq!(op(&mut honest), Ok(()));

        let mut lying = Overstated { grid: distinct_grid(3, 4), extra_rows: 1 };
        assert!(matches!(op(&mut lying), Err(PictureError::OutOfBounds { row: 3, .. })));
    }
}
