// THEORY:
// The `parallel_pipeline` runs one `Pipeline` over many picture files at once.
// Each job owns its grid from decode to encode, so no grid is ever shared between
// tasks and the core's single-writer assumption holds. Decoding, transforming and
// encoding are CPU-bound, so every job runs on tokio's blocking pool and at most
// `concurrency` jobs are in flight (one per CPU by default).
//
// Jobs may finish in any order; outcomes are handed back in submission order. A
// failing job is recorded in its outcome and never cancels the others. A batch in
// which two jobs write the same output path is rejected before any job starts.

use crate::core_modules::utils::image_helper::image_helper::{load_grid, save_grid};
use crate::pipeline::{Pipeline, PipelineConfig};
use anyhow::{Context, Result, anyhow, bail};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One input file and where to write its transformed copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl BatchJob {
    /// Writes the output under `out_dir` with the input's file name.
    pub fn into_dir(input: impl Into<PathBuf>, out_dir: &Path) -> Result<Self> {
        let input = input.into();
        let file_name = input
            .file_name()
            .ok_or_else(|| anyhow!("input {} has no file name", input.display()))?;
        let output = out_dir.join(file_name);
        Ok(Self { input, output })
    }
}

/// Fails on the first output path claimed by more than one job.
pub fn check_unique_outputs(jobs: &[BatchJob]) -> Result<()> {
    let mut seen: HashSet<&Path> = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !seen.insert(job.output.as_path()) {
            bail!(
                "more than one input would be written to {} ({} among them)",
                job.output.display(),
                job.input.display()
            );
        }
    }
    Ok(())
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub job: BatchJob,
    pub result: Result<()>,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct BatchProcessor {
    pipeline: Arc<Pipeline>,
    concurrency: usize,
}

impl BatchProcessor {
    pub fn new(config: PipelineConfig, concurrency: usize) -> Self {
        Self {
            pipeline: Arc::new(Pipeline::new(config)),
            concurrency: concurrency.max(1),
        }
    }

    /// One in-flight job per logical CPU.
    pub fn with_default_concurrency(config: PipelineConfig) -> Self {
        Self::new(config, num_cpus::get())
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn process_all(&self, jobs: Vec<BatchJob>) -> Result<Vec<BatchOutcome>> {
        check_unique_outputs(&jobs)?;
        log::info!("processing {} picture(s), {} at a time", jobs.len(), self.concurrency);

        let mut outcomes: Vec<(usize, BatchOutcome)> = stream::iter(jobs.into_iter().enumerate())
            .map(|(index, job)| {
                let pipeline = Arc::clone(&self.pipeline);
                async move { (index, Self::process_job(pipeline, job).await) }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        outcomes.sort_by_key(|(index, _)| *index);
        Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
    }

    async fn process_job(pipeline: Arc<Pipeline>, job: BatchJob) -> BatchOutcome {
        let started = Instant::now();
        let task_job = job.clone();
        let worker = tokio::task::spawn_blocking(move || run_job(&pipeline, &task_job));
        let result = match worker.await {
            Ok(result) => result,
            Err(join_error) => Err(anyhow!(join_error).context("picture worker panicked")),
        };

        match &result {
            Ok(()) => log::info!("{} -> {}", job.input.display(), job.output.display()),
            Err(err) => log::warn!("{}: {err:#}", job.input.display()),
        }

        BatchOutcome {
            job,
            result,
            elapsed: started.elapsed(),
        }
    }
}

fn run_job(pipeline: &Pipeline, job: &BatchJob) -> Result<()> {
    let mut grid = load_grid(&job.input)?;
    pipeline
        .run(&mut grid)
        .with_context(|| format!("failed to transform {}", job.input.display()))?;
    save_grid(&grid, &job.output)
}
