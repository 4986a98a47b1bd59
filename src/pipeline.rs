// THEORY:
// The `pipeline` module is the top-level API for sequencing transformations. A
// caller describes a call chain once, as a `PipelineConfig` (an ordered list of
// `Operation`s plus the posterization `Palette`), and then runs it over any number
// of grids. Every operation mutates the grid in place; the first failing step
// stops the chain and its error is returned unchanged.
//
// Recipes give the chain a compact text form for command lines and batch jobs:
// operations are joined with `+`, parameters follow a `:` and are comma
// separated, e.g. `grayscale+posterize:50,100,150` or `edge:20`.

use crate::core_modules::edge_detector::edge_detect;
use crate::core_modules::error::{PictureError, Result};
use crate::core_modules::geometry::{self, MirrorWindow, Region, TEMPLE_WINDOW};
use crate::core_modules::pixel_grid::Raster;
use crate::core_modules::pointwise;
use crate::core_modules::posterizer::{self, Palette, Thresholds};
use std::fmt;
use std::str::FromStr;

// Re-export key data structures for the public API.
pub use crate::core_modules::color::color::Color;
pub use crate::core_modules::pixel_grid::PixelGrid;

const RECIPE_SEPARATOR: char = '+';

/// One step of a call chain, with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    ZeroBlue,
    KeepOnlyBlue,
    Negate,
    Grayscale,
    Posterize(Thresholds),
    /// Grayscale followed by range-derived posterization.
    Transform,
    MirrorVertical,
    MirrorVerticalRightToLeft,
    MirrorHorizontal,
    MirrorHorizontalBottomToTop,
    MirrorRegion(MirrorWindow),
    MirrorTemple,
    /// Same-grid copy of a region to `(dest_row, dest_col)`.
    CopyWithin {
        region: Region,
        dest_row: usize,
        dest_col: usize,
    },
    EdgeDetect(f64),
}

impl Operation {
    pub fn apply<R: Raster>(&self, grid: &mut R, palette: &Palette) -> Result<()> {
        match self {
            Operation::ZeroBlue => pointwise::zero_blue(grid),
            Operation::KeepOnlyBlue => pointwise::keep_only_blue(grid),
            Operation::Negate => pointwise::negate(grid),
            Operation::Grayscale => pointwise::grayscale(grid),
            Operation::Posterize(thresholds) => posterizer::posterize(grid, palette, thresholds),
            Operation::Transform => posterizer::transform(grid, palette).map(|_| ()),
            Operation::MirrorVertical => geometry::mirror_vertical(grid),
            Operation::MirrorVerticalRightToLeft => geometry::mirror_vertical_right_to_left(grid),
            Operation::MirrorHorizontal => geometry::mirror_horizontal(grid),
            Operation::MirrorHorizontalBottomToTop => {
                geometry::mirror_horizontal_bottom_to_top(grid)
            }
            Operation::MirrorRegion(window) => geometry::mirror_region(grid, window),
            Operation::MirrorTemple => geometry::mirror_region(grid, &TEMPLE_WINDOW),
            Operation::CopyWithin {
                region,
                dest_row,
                dest_col,
            } => geometry::copy_region_within(grid, region, *dest_row, *dest_col),
            Operation::EdgeDetect(threshold) => edge_detect(grid, *threshold),
        }
    }
}

fn parse_numbers<T: FromStr>(name: &str, args: Option<&str>, expected: usize) -> Result<Vec<T>> {
    let args = args.ok_or_else(|| {
        PictureError::invalid(format!("`{name}` needs {expected} parameter(s)"))
    })?;
    let values = args
        .split(',')
        .map(|v| v.trim().parse::<T>())
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|_| {
            PictureError::invalid(format!("`{name}` has a malformed parameter in `{args}`"))
        })?;
    if values.len() != expected {
        return Err(PictureError::invalid(format!(
            "`{name}` needs {expected} parameter(s), got {}",
            values.len()
        )));
    }
    Ok(values)
}

impl FromStr for Operation {
    type Err = PictureError;

    fn from_str(token: &str) -> Result<Self> {
        let token = token.trim();
        let (name, args) = match token.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (token, None),
        };
        let no_args = |op: Operation| match args {
            None => Ok(op),
            Some(_) => Err(PictureError::invalid(format!("`{name}` takes no parameters"))),
        };

        match name {
            "zero-blue" => no_args(Operation::ZeroBlue),
            "keep-only-blue" => no_args(Operation::KeepOnlyBlue),
            "negate" => no_args(Operation::Negate),
            "grayscale" => no_args(Operation::Grayscale),
            "transform" => no_args(Operation::Transform),
            "mirror-vertical" => no_args(Operation::MirrorVertical),
            "mirror-vertical-rtl" => no_args(Operation::MirrorVerticalRightToLeft),
            "mirror-horizontal" => no_args(Operation::MirrorHorizontal),
            "mirror-horizontal-btt" => no_args(Operation::MirrorHorizontalBottomToTop),
            "mirror-temple" => no_args(Operation::MirrorTemple),
            "posterize" => {
                let t = parse_numbers::<f64>(name, args, 3)?;
                Ok(Operation::Posterize(Thresholds::new(t[0], t[1], t[2])?))
            }
            "mirror-region" => {
                let v = parse_numbers::<usize>(name, args, 4)?;
                Ok(Operation::MirrorRegion(MirrorWindow {
                    pivot_col: v[0],
                    row_start: v[1],
                    row_end: v[2],
                    col_start: v[3],
                }))
            }
            "copy" => {
                let v = parse_numbers::<usize>(name, args, 6)?;
                Ok(Operation::CopyWithin {
                    region: Region::new(v[0], v[1], v[2], v[3]),
                    dest_row: v[4],
                    dest_col: v[5],
                })
            }
            "edge" => {
                let threshold = parse_numbers::<f64>(name, args, 1)?[0];
                if threshold.is_nan() || threshold < 0.0 {
                    return Err(PictureError::invalid(format!(
                        "edge threshold must be non-negative, got {threshold}"
                    )));
                }
                Ok(Operation::EdgeDetect(threshold))
            }
            "" => Err(PictureError::invalid("empty operation in recipe")),
            other => Err(PictureError::invalid(format!("unknown operation `{other}`"))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ZeroBlue => write!(f, "zero-blue"),
            Operation::KeepOnlyBlue => write!(f, "keep-only-blue"),
            Operation::Negate => write!(f, "negate"),
            Operation::Grayscale => write!(f, "grayscale"),
            Operation::Posterize(t) => {
                let [t1, t2, t3] = t.bounds();
                write!(f, "posterize:{t1},{t2},{t3}")
            }
            Operation::Transform => write!(f, "transform"),
            Operation::MirrorVertical => write!(f, "mirror-vertical"),
            Operation::MirrorVerticalRightToLeft => write!(f, "mirror-vertical-rtl"),
            Operation::MirrorHorizontal => write!(f, "mirror-horizontal"),
            Operation::MirrorHorizontalBottomToTop => write!(f, "mirror-horizontal-btt"),
            Operation::MirrorRegion(w) => write!(
                f,
                "mirror-region:{},{},{},{}",
                w.pivot_col, w.row_start, w.row_end, w.col_start
            ),
            Operation::MirrorTemple => write!(f, "mirror-temple"),
            Operation::CopyWithin {
                region,
                dest_row,
                dest_col,
            } => write!(
                f,
                "copy:{},{},{},{},{dest_row},{dest_col}",
                region.row_start, region.row_end, region.col_start, region.col_end
            ),
            Operation::EdgeDetect(threshold) => write!(f, "edge:{threshold}"),
        }
    }
}

/// Configuration for a `Pipeline`: what to run, in order, and with which palette.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    pub operations: Vec<Operation>,
    /// Bucket colors used by `Posterize` and `Transform`.
    pub palette: Palette,
}

impl PipelineConfig {
    pub fn from_recipe(recipe: &str, palette: Palette) -> Result<Self> {
        Ok(Self {
            operations: Self::parse_recipe(recipe)?,
            palette,
        })
    }

    pub fn parse_recipe(recipe: &str) -> Result<Vec<Operation>> {
        if recipe.trim().is_empty() {
            return Err(PictureError::invalid("recipe is empty"));
        }
        recipe.split(RECIPE_SEPARATOR).map(str::parse).collect()
    }
}

/// Runs a fixed chain of operations over grids.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run<R: Raster>(&self, grid: &mut R) -> Result<()> {
        let (height, width) = grid.dimensions();
        for (step, operation) in self.config.operations.iter().enumerate() {
            log::debug!("step {step}: {operation} on {height}x{width} grid");
            operation.apply(grid, &self.config.palette).inspect_err(|err| {
                log::warn!("step {step} ({operation}) failed: {err}");
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_grid::tests::distinct_grid;
    use rstest::rstest;

    #[rstest]
    #[case("zero-blue", Operation::ZeroBlue)]
    #[case("keep-only-blue", Operation::KeepOnlyBlue)]
    #[case(" negate ", Operation::Negate)]
    #[case("grayscale", Operation::Grayscale)]
    #[case("transform", Operation::Transform)]
    #[case("mirror-vertical", Operation::MirrorVertical)]
    #[case("mirror-vertical-rtl", Operation::MirrorVerticalRightToLeft)]
    #[case("mirror-horizontal", Operation::MirrorHorizontal)]
    #[case("mirror-horizontal-btt", Operation::MirrorHorizontalBottomToTop)]
    #[case("mirror-temple", Operation::MirrorTemple)]
    #[case("edge:20", Operation::EdgeDetect(20.0))]
    #[case("edge:7.5", Operation::EdgeDetect(7.5))]
    fn parses_operation_tokens(#[case] token: &str, #[case] expected: Operation) {
        assert_eq!(token.parse::<Operation>().unwrap(), expected);
    }

    #[test]
    fn parses_parameterized_tokens() {
        assert_eq!(
            "posterize:50,100,150".parse::<Operation>().unwrap(),
            Operation::Posterize(Thresholds::new(50.0, 100.0, 150.0).unwrap())
        );
        assert_eq!(
            "mirror-region:276,27,97,13".parse::<Operation>().unwrap(),
            Operation::MirrorRegion(TEMPLE_WINDOW)
        );
        assert_eq!(
            "copy:0,2,0,2,1,1".parse::<Operation>().unwrap(),
            Operation::CopyWithin {
                region: Region::new(0, 2, 0, 2),
                dest_row: 1,
                dest_col: 1,
            }
        );
    }

    #[rstest]
    #[case::unknown("blur")]
    #[case::empty("")]
    #[case::missing_args("edge")]
    #[case::extra_args("negate:1")]
    #[case::wrong_count("posterize:1,2")]
    #[case::descending("posterize:150,100,50")]
    #[case::malformed("mirror-region:a,b,c,d")]
    #[case::negative_edge("edge:-3")]
    fn rejects_bad_tokens(#[case] token: &str) {
        assert!(matches!(token.parse::<Operation>(), Err(PictureError::InvalidParameter(_))));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let recipe =
            "grayscale+posterize:50,100,150+mirror-region:3,0,2,1+copy:0,1,0,2,1,0+edge:12.5";
        let operations = PipelineConfig::parse_recipe(recipe).unwrap();
        let rendered: Vec<String> = operations.iter().map(ToString::to_string).collect();
        assert_eq!(rendered.join("+"), recipe);
    }

    #[test]
    fn empty_recipe_is_rejected() {
        assert!(PipelineConfig::parse_recipe("  ").is_err());
        assert!(PipelineConfig::parse_recipe("negate++negate").is_err());
    }

    #[test]
    fn runs_operations_in_order() {
        let original = distinct_grid(3, 4);
        let config =
            PipelineConfig::from_recipe("negate+negate+mirror-vertical", Palette::default())
                .unwrap();
        let mut grid = original.clone();
        Pipeline::new(config).run(&mut grid).unwrap();

        let mut expected = original.clone();
        geometry::mirror_vertical(&mut expected).unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn transform_step_uses_configured_palette() {
        let palette = Palette([Color::BLACK, Color::BLACK, Color::BLACK, Color::WHITE]);
        let config = PipelineConfig::from_recipe("transform", palette).unwrap();
        let mut grid = PixelGrid::filled(2, 2, Color::gray(42)).unwrap();
        Pipeline::new(config).run(&mut grid).unwrap();
        assert!(grid.pixels().all(|(_, _, c)| c == Color::WHITE));
    }

    #[test]
    fn stops_at_first_failing_step() {
        let config =
            PipelineConfig::from_recipe("negate+mirror-temple+negate", Palette::default())
                .unwrap();
        let original = distinct_grid(3, 4);
        let mut grid = original.clone();
        let err = Pipeline::new(config).run(&mut grid).unwrap_err();
        assert!(matches!(err, PictureError::InvalidParameter(_)));

        // only the first negate ran
        let mut expected = original.clone();
        pointwise::negate(&mut expected).unwrap();
        assert_eq!(grid, expected);
    }
}
