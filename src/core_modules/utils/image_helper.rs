// THEORY:
// Decoding and encoding picture files is not part of the transformation engine;
// this helper is the thin bridge between files on disk and a `PixelGrid`. It
// delegates all format work to the `image` crate and only converts pixels.

pub mod image_helper {
    use crate::core_modules::color::color::Color;
    use crate::core_modules::error::PictureError;
    use crate::core_modules::pixel_grid::{PixelGrid, Raster};
    use anyhow::{Context, Result};
    use image::{ImageEncoder, RgbImage};
    use std::path::Path;

    /// Converts a decoded RGB image into a grid.
    pub fn from_rgb_image(image: &RgbImage) -> Result<PixelGrid, PictureError> {
        let (width, height) = image.dimensions();
        let colors = image.pixels().map(|p| Color::from(*p)).collect();
        PixelGrid::from_colors(height as usize, width as usize, colors)
    }

    pub fn to_rgb_image(grid: &PixelGrid) -> RgbImage {
        let (height, width) = (grid.height() as u32, grid.width() as u32);
        let mut image = RgbImage::new(width, height);
        for (row, col, color) in grid.pixels() {
            image.put_pixel(col as u32, row as u32, color.into());
        }
        image
    }

    /// Decodes any format the `image` crate was built with into a grid.
    pub fn load_grid(path: impl AsRef<Path>) -> Result<PixelGrid> {
        let path = path.as_ref();
        let decoded =
            image::open(path).with_context(|| format!("failed to decode {}", path.display()))?;
        let grid = from_rgb_image(&decoded.to_rgb8())?;
        log::debug!("loaded {} as {grid}", path.display());
        Ok(grid)
    }

    /// Encodes the grid with the format implied by the file extension.
    pub fn save_grid(grid: &PixelGrid, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        to_rgb_image(grid)
            .save(path)
            .with_context(|| format!("failed to encode {}", path.display()))?;
        log::debug!("saved {grid} to {}", path.display());
        Ok(())
    }

    /// Encodes the grid as an in-memory PNG.
    pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>> {
        let rgb = to_rgb_image(grid);
        let mut buffer = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
        encoder.write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(buffer)
    }

    pub fn decode_grid(bytes: &[u8]) -> Result<PixelGrid> {
        let decoded = image::load_from_memory(bytes).context("failed to decode image bytes")?;
        Ok(from_rgb_image(&decoded.to_rgb8())?)
    }
}

#[cfg(test)]
mod tests {
    use super::image_helper::*;
    use crate::core_modules::color::color::Color;
    use crate::core_modules::pixel_grid::tests::distinct_grid;
    use crate::core_modules::pixel_grid::{PixelGrid, Raster};

    #[test]
    fn rgb_image_conversion_keeps_row_and_column_order() {
        let grid = distinct_grid(2, 3);
        let image = to_rgb_image(&grid);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(Color::from(*image.get_pixel(2, 1)), grid.color_at(1, 2).unwrap());
        assert_eq!(from_rgb_image(&image).unwrap(), grid);
    }

    #[test]
    fn png_bytes_decode_to_the_same_grid() {
        let grid = distinct_grid(4, 5);
        let bytes = encode_png(&grid).unwrap();
        assert_eq!(decode_grid(&bytes).unwrap(), grid);
    }

    #[test]
    fn save_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let grid = distinct_grid(6, 9);
        save_grid(&grid, &path).unwrap();
        assert_eq!(load_grid(&path).unwrap(), grid);
    }

    #[test]
    fn load_missing_file_names_the_path() {
        let err = load_grid("/definitely/not/here.png").unwrap_err();
        assert!(err.to_string().contains("not/here.png"));
    }

    #[test]
    fn empty_image_is_rejected() {
        let empty = image::RgbImage::new(0, 0);
        assert!(from_rgb_image(&empty).is_err());
        assert!(PixelGrid::new(1, 1).is_ok());
    }
}
