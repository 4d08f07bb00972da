//! Helpers shared by the unit tests.

use std::path::Path;

use crate::Table;

macro_rules! inline_csv {
    ($line:literal) => {
        $line
    };
    ($line:literal, $($lines:literal),+ $(,)?) => {
        concat!($line, "\n", inline_csv!($($lines),+))
    };
}

/// Parse an inline CSV the same way an extract on disk is read.
pub fn table(input: &str) -> Table {
    crate::load::read_csv(
        Table::configured_csv_reader_builder().from_reader(input.as_bytes()),
        Path::new("inline.csv"),
    )
    .unwrap()
}
