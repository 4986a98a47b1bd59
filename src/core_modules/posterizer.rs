// THEORY:
// The `posterizer` turns a picture into four flat color bands. It is the one
// two-pass algorithm in the engine and is split accordingly:
//
// 1.  **Analysis**: `analyze` scans the whole grid and returns an immutable
//     `IntensityRange` (min and max of the red channel). Nothing is written.
// 2.  **Mutation**: `posterize` classifies every pixel against `Thresholds` and
//     overwrites it with the matching `Palette` color.
//
// `transform` chains grayscale -> analyze -> posterize. Because `Thresholds` can
// only be derived from a finished `IntensityRange`, no pixel can be overwritten
// before the scan has seen the entire grid.
//
// Two behaviors are kept exactly as the reference pictures were produced:
// - Bucket comparisons are strict. A value equal to `t1` or `t2` fails every
//   band test and lands in the last bucket.
// - Derived thresholds are absolute quarters of `max - min`. They are not
//   offset by `min`.

use crate::core_modules::color::color::{Color, Intensity};
use crate::core_modules::error::{PictureError, Result};
use crate::core_modules::pixel_grid::Raster;
use crate::core_modules::pointwise::grayscale;
use std::str::FromStr;

pub const BUCKET_COUNT: usize = 4;

/// One of the four posterize bands, darkest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Darkest,
    Dark,
    Light,
    Lightest,
}

impl Bucket {
    pub const ALL: [Bucket; BUCKET_COUNT] =
        [Bucket::Darkest, Bucket::Dark, Bucket::Light, Bucket::Lightest];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Summary statistics of a grayscale grid, read from the red channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityRange {
    pub min: Intensity,
    pub max: Intensity,
}

impl IntensityRange {
    pub fn total_range(&self) -> f64 {
        self.max as f64 - self.min as f64
    }
}

/// Three band boundaries `t1 <= t2 <= t3` used to pick one of four buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    bounds: [f64; 3],
}

impl Thresholds {
    /// Caller-supplied thresholds must be finite and strictly ascending.
    pub fn new(t1: f64, t2: f64, t3: f64) -> Result<Self> {
        if !(t1.is_finite() && t2.is_finite() && t3.is_finite()) {
            return Err(PictureError::invalid(format!(
                "thresholds must be finite, got ({t1}, {t2}, {t3})"
            )));
        }
        if !(t1 < t2 && t2 < t3) {
            return Err(PictureError::invalid(format!(
                "thresholds must be strictly ascending, got ({t1}, {t2}, {t3})"
            )));
        }
        Ok(Self { bounds: [t1, t2, t3] })
    }

    /// Quarter thresholds of the total range. A flat image yields `(0, 0, 0)`.
    pub fn from_range(range: &IntensityRange) -> Self {
        let t1 = range.total_range() / 4.0;
        Self {
            bounds: [t1, t1 * 2.0, t1 * 3.0],
        }
    }

    pub fn bounds(&self) -> [f64; 3] {
        self.bounds
    }

    /// Bucket for `value`, using strict comparisons on both sides of each band.
    pub fn bucket(&self, value: Intensity) -> Bucket {
        let v = value as f64;
        let [t1, t2, t3] = self.bounds;
        if v < t1 {
            Bucket::Darkest
        } else if v > t1 && v < t2 {
            Bucket::Dark
        } else if v > t2 && v < t3 {
            Bucket::Light
        } else {
            Bucket::Lightest
        }
    }
}

/// The four output colors, indexed by bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [Color; BUCKET_COUNT]);

impl Default for Palette {
    fn default() -> Self {
        Palette([Color::PURPLE, Color::ORANGE, Color::CYAN, Color::YELLOW])
    }
}

impl Palette {
    pub fn bucket_color(&self, bucket: Bucket) -> Color {
        self.0[bucket.index()]
    }
}

impl FromStr for Palette {
    type Err = PictureError;

    /// Parses four comma separated `rrggbb` colors, darkest bucket first.
    fn from_str(s: &str) -> Result<Self> {
        let colors = s
            .split(',')
            .map(|hex| {
                Color::from_hex(hex.trim())
                    .ok_or_else(|| PictureError::invalid(format!("`{hex}` is not an rrggbb color")))
            })
            .collect::<Result<Vec<Color>>>()?;
        let colors: [Color; BUCKET_COUNT] = colors.try_into().map_err(|colors: Vec<Color>| {
            PictureError::invalid(format!(
                "a palette needs {BUCKET_COUNT} colors, got {}",
                colors.len()
            ))
        })?;
        Ok(Palette(colors))
    }
}

/// Pass 1: finds the minimum and maximum red channel value across the grid.
pub fn analyze<R: Raster>(grid: &R) -> Result<IntensityRange> {
    let (height, width) = grid.dimensions();
    let mut bounds: Option<(Intensity, Intensity)> = None;
    for row in 0..height {
        for col in 0..width {
            let red = grid.color_at(row, col)?.red;
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(red), max.max(red)),
                None => (red, red),
            });
        }
    }
    let (min, max) = bounds.unwrap_or((0, 0));
    Ok(IntensityRange { min, max })
}

/// Pass 2: overwrites every pixel with the palette color of its red channel's bucket.
pub fn posterize<R: Raster>(
    grid: &mut R,
    palette: &Palette,
    thresholds: &Thresholds,
) -> Result<()> {
    grid.map_colors(|c| palette.bucket_color(thresholds.bucket(c.red)))
}

/// Grayscale, then posterize into four bands derived from the picture's own range.
pub fn transform<R: Raster>(grid: &mut R, palette: &Palette) -> Result<IntensityRange> {
    grayscale(grid)?;
    let range = analyze(grid)?;
    let thresholds = Thresholds::from_range(&range);
    log::trace!(
        "posterize range {}..={} thresholds {:?}",
        range.min,
        range.max,
        thresholds.bounds()
    );
    posterize(grid, palette, &thresholds)?;
    Ok(range)
}
