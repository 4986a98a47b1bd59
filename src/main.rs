// Command-line runner for the `picture_lab` library: applies one recipe of
// transformations to every input picture and writes the results to a directory.

use anyhow::{Context, Result, bail};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use picture_lab::core_modules::posterizer::Palette;
use picture_lab::parallel_pipeline::{BatchJob, BatchProcessor};
use picture_lab::pipeline::PipelineConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Transform pictures with channel maps, posterization, mirrors and edge detection.",
    long_about = None,
)]
struct Cli {
    /// Input pictures
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the transformed pictures (created if missing)
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Operations joined with `+`, e.g. `grayscale+edge:20` or `transform`
    #[arg(short, long)]
    recipe: String,

    /// Four comma separated rrggbb bucket colors, darkest first
    #[arg(long)]
    palette: Option<Palette>,

    /// Maximum number of pictures processed at once [default: number of CPUs]
    #[arg(short, long)]
    jobs: Option<usize>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::from_recipe(&cli.recipe, cli.palette.unwrap_or_default())
        .with_context(|| format!("invalid recipe `{}`", cli.recipe))?;

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;

    let jobs = cli
        .inputs
        .iter()
        .map(|input| BatchJob::into_dir(input, &cli.out_dir))
        .collect::<Result<Vec<_>>>()?;

    let processor = match cli.jobs {
        Some(limit) => BatchProcessor::new(config, limit),
        None => BatchProcessor::with_default_concurrency(config),
    };

    let outcomes = processor.process_all(jobs).await?;
    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!(
                "{} -> {} ({} ms)",
                outcome.job.input.display(),
                outcome.job.output.display(),
                outcome.elapsed.as_millis()
            ),
            Err(err) => eprintln!("{}: {err:#}", outcome.job.input.display()),
        }
    }

    if failed > 0 {
        bail!("{failed} of {} picture(s) failed", outcomes.len());
    }
    Ok(())
}
