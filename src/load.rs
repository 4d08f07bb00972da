//! Read the Export and RNI extracts from disk.

use std::fs::File;
use std::path::Path;

use crate::table::cell_from_field;
use crate::{PipelineError, Result, Table};

/// Load the Export and RNI extracts, in that order.
pub fn load(export_path: &Path, rni_path: &Path) -> Result<(Table, Table)> {
    let export = read_table(export_path)?;
    let rni = read_table(rni_path)?;
    Ok((export, rni))
}

/// Read a single CSV file into a [Table]. No column is required at this point.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|source| PipelineError::FileNotAccessible {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_csv(Table::configured_csv_reader_builder().from_reader(file), path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.width(),
        "loaded table"
    );
    Ok(table)
}

pub(crate) fn read_csv<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
) -> Result<Table> {
    let headers = reader.headers().map_err(malformed(path))?;
    let mut table = Table::new(headers.iter().map(str::to_owned).collect());

    for record in reader.records() {
        let record = record.map_err(malformed(path))?;
        if record.len() > table.width() {
            return Err(PipelineError::RaggedRow {
                path: path.to_path_buf(),
                line: record.position().map_or(0, csv::Position::line),
                expected: table.width(),
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(cell_from_field).collect());
    }

    Ok(table)
}

fn malformed(path: &Path) -> impl Fn(csv::Error) -> PipelineError + '_ {
    move |source| PipelineError::MalformedInput {
        path: path.to_path_buf(),
        source,
    }
}
