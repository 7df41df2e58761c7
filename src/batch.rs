//! Sequential, best-effort processing of a job list.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{error, info, instrument, warn};

use crate::config::Job;
use crate::error::LetterboxError;
use crate::letterbox::{LetterboxSettings, letterbox_file};
use crate::processing::layout::LetterboxPlan;

/// What happened to one job.
#[derive(Debug)]
pub enum Outcome {
    Written(LetterboxPlan),
    /// Source path did not exist; the destination was not touched.
    NotFound,
    Failed(LetterboxError),
}

impl Outcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<(Job, Outcome)>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written(_)))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, Outcome::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// True when every job produced its output.
    pub fn is_clean(&self) -> bool {
        self.results.iter().all(|(_, o)| o.is_written())
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Process `jobs` in order. Per-job failures are logged and recorded, never
/// propagated.
#[instrument(skip_all, fields(jobs = jobs.len(), width = settings.width, height = settings.height))]
pub fn run_batch(jobs: &[Job], settings: &LetterboxSettings) -> BatchReport {
    let mut report = BatchReport::default();
    for job in jobs {
        let outcome = run_job(job, settings);
        report.results.push((job.clone(), outcome));
    }
    info!(
        written = report.written(),
        missing = report.missing(),
        failed = report.failed(),
        "batch complete"
    );
    report
}

pub fn run_job(job: &Job, settings: &LetterboxSettings) -> Outcome {
    match source_exists(&job.source) {
        Ok(true) => {}
        Ok(false) => {
            warn!(path = %job.source.display(), "file not found");
            return Outcome::NotFound;
        }
        Err(err) => {
            error!(path = %job.source.display(), error = %err, "error checking source");
            return Outcome::Failed(err);
        }
    }

    match letterbox_file(&job.source, &job.destination, settings) {
        Ok(plan) => {
            info!(
                source = %job.source.display(),
                destination = %job.destination.display(),
                "letterboxed"
            );
            Outcome::Written(plan)
        }
        Err(err) => {
            error!(
                path = %job.source.display(),
                kind = err.kind(),
                error = %err,
                "error processing image"
            );
            Outcome::Failed(err)
        }
    }
}

/// A path whose parent is a regular file does not exist either; only
/// failures to answer the question at all are errors.
fn source_exists(path: &Path) -> Result<bool, LetterboxError> {
    match path.try_exists() {
        Ok(exists) => Ok(exists),
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(source) => Err(LetterboxError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
