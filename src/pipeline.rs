//! The upload pipeline: load -> preprocess -> merge -> format -> write.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::{format, load, merge, preprocess, upload_file_name, write_upload, Result};

/// The steps of a pipeline run, in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Load,
    Preprocess,
    Merge,
    Format,
    Write,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Load,
        Stage::Preprocess,
        Stage::Merge,
        Stage::Format,
        Stage::Write,
    ];

    /// How far along the run is once this stage starts, in percent.
    pub fn progress(self) -> u8 {
        match self {
            Stage::Load => 10,
            Stage::Preprocess => 30,
            Stage::Merge => 50,
            Stage::Format => 70,
            Stage::Write => 90,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Load => "loading",
            Stage::Preprocess => "preprocessing",
            Stage::Merge => "merging",
            Stage::Format => "formatting",
            Stage::Write => "writing",
        };
        f.write_str(name)
    }
}

/// Everything a run needs. The output file name is fixed when the request is created, so a run
/// crossing midnight still writes a single, predictable file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRequest {
    pub export_path: PathBuf,
    pub rni_path: PathBuf,
    pub output_path: PathBuf,
}

impl RunRequest {
    pub fn new(
        export_path: PathBuf,
        rni_path: PathBuf,
        output_dir: &Path,
        date: NaiveDate,
    ) -> Self {
        Self {
            export_path,
            rni_path,
            output_path: output_dir.join(upload_file_name(date)),
        }
    }

    /// A request writing today's upload file into `output_dir`.
    pub fn for_today(export_path: PathBuf, rni_path: PathBuf, output_dir: &Path) -> Self {
        Self::new(export_path, rni_path, output_dir, Local::now().date_naive())
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub rows: usize,
}

/// Run every stage in order, calling `on_stage` before each of them. The first error aborts the
/// run.
pub fn run<F>(request: &RunRequest, mut on_stage: F) -> Result<RunSummary>
where
    F: FnMut(Stage),
{
    let _span = tracing::info_span!("run", output = %request.output_path.display()).entered();

    on_stage(Stage::Load);
    let (export, rni) = load(&request.export_path, &request.rni_path)?;

    on_stage(Stage::Preprocess);
    let (export, rni) = preprocess(export, rni)?;

    on_stage(Stage::Merge);
    let merged = merge(&export, &rni)?;
    // Inputs are no longer needed
    drop((export, rni));

    on_stage(Stage::Format);
    let records = format(&merged)?;

    on_stage(Stage::Write);
    write_upload(&records, &request.output_path)?;

    Ok(RunSummary {
        output_path: request.output_path.clone(),
        rows: records.len(),
    })
}
