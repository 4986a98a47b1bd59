// THEORY:
// This file is the main entry point for the `picture_lab` library crate.
// It exposes an in-memory picture transformation engine: a fixed-size grid of RGB
// pixels and the operations that rewrite it in place (channel maps, grayscale,
// range-driven posterization, mirroring, region copies and edge detection).
//
// `pipeline` is the high-level interface for sequencing those operations, and
// `parallel_pipeline` runs a pipeline over many picture files concurrently. The
// individual algorithms live in `core_modules` and can be called directly.

pub mod core_modules;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::color::color::Color;
pub use core_modules::error::{PictureError, Result};
pub use core_modules::pixel_grid::{PixelGrid, Raster};
pub use core_modules::utils::image_helper::image_helper::{load_grid, save_grid};
