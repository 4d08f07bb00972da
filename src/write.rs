//! Persist the upload file.

use std::path::Path;

use chrono::NaiveDate;

use crate::{PipelineError, Result, UploadRecord, OUTPUT_COLUMNS};

/// Every upload file name starts with this, followed by the `MMDDYY` date of the run.
pub const UPLOAD_FILE_PREFIX: &str = "SpringbrookUpload";

/// The name of the upload file generated on `date`, e.g: `SpringbrookUpload040525.csv`.
pub fn upload_file_name(date: NaiveDate) -> String {
    format!("{UPLOAD_FILE_PREFIX}{}.csv", date.format("%m%d%y"))
}

/// Serialize upload records to CSV. The header row is always written, even without records.
pub fn dump_csv<W: std::io::Write>(
    records: &[UploadRecord],
    writer: &mut csv::Writer<W>,
) -> csv::Result<()> {
    writer.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the upload file at `path`, replacing any existing file.
///
/// The whole file is rendered in memory first, so nothing is created on disk if serialization
/// fails.
pub fn write_upload(records: &[UploadRecord], path: &Path) -> Result<()> {
    let io_failure = |source: std::io::Error| PipelineError::IoFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = configured_csv_writer_builder().from_writer(vec![]);
    dump_csv(records, &mut writer).map_err(|err| io_failure(err.into()))?;
    let contents = writer
        .into_inner()
        .map_err(|err| io_failure(err.into_error()))?;
    std::fs::write(path, contents).map_err(io_failure)?;

    tracing::info!(path = %path.display(), rows = records.len(), "wrote upload file");
    Ok(())
}

// Headers are written explicitly by [dump_csv]
fn configured_csv_writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.has_headers(false);
    builder
}
