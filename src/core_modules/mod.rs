pub mod color;
pub mod edge_detector;
pub mod error;
pub mod geometry;
pub mod pixel_grid;
pub mod pointwise;
pub mod posterizer;
pub mod utils;
