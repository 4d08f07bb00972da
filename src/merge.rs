//! Join the Export and RNI extracts on the meter serial number.

use std::collections::HashMap;

use crate::core::{column, Mxuid};
use crate::{Cell, PipelineError, Result, Stage, Table};

/// The RNI columns carried over into the merged table.
pub const RNI_COLUMNS: [&str; 4] = [
    column::METER_ID,
    column::FLEXNET_ID,
    column::LATITUDE,
    column::LONGITUDE,
];

/// Inner join of `export` and `rni` on `SerialNumber == Meter ID`, with the `MXUID` column derived
/// from the RNI `FlexNet ID`.
///
/// An Export row matching several RNI rows is repeated once per match. Rows are ordered by Export
/// row first, RNI row second. Rows with an empty key never match anything.
pub fn merge(export: &Table, rni: &Table) -> Result<Table> {
    let serial_number = export.require_column(column::SERIAL_NUMBER, Stage::Merge)?;
    let meter_id = rni.require_column(column::METER_ID, Stage::Merge)?;
    let pulled = RNI_COLUMNS
        .iter()
        .map(|name| rni.require_column(name, Stage::Merge))
        .collect::<Result<Vec<_>>>()?;

    let mut matches: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, row) in rni.rows().iter().enumerate() {
        if let Some(key) = join_key(&row[meter_id]) {
            matches.entry(key).or_default().push(index);
        }
    }

    let mut merged = Table::new(merged_columns(export));
    for export_row in export.rows() {
        let Some(rni_rows) = join_key(&export_row[serial_number]).and_then(|key| matches.get(key))
        else {
            continue;
        };
        for &rni_index in rni_rows {
            let rni_row = &rni.rows()[rni_index];
            let mut row = export_row.clone();
            row.extend(pulled.iter().map(|&index| rni_row[index].clone()));
            merged.push_row(row);
        }
    }

    // Pulled columns follow the Export ones
    let flexnet_id = export.width() + 1;
    let mxuids = merged
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| derive_mxuid(&cells[flexnet_id], row).map(|id| Some(id.to_string())))
        .collect::<Result<Vec<Cell>>>()?;
    merged.set_column(column::MXUID, mxuids);

    tracing::info!(
        export_rows = export.len(),
        rni_rows = rni.len(),
        merged_rows = merged.len(),
        "merged extracts"
    );
    Ok(merged)
}

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

fn suffixed(name: &str, suffix: &str) -> String {
    format!("{name}{suffix}")
}

/// Export columns followed by the pulled RNI columns. Names present on both sides are
/// disambiguated with a suffix.
fn merged_columns(export: &Table) -> Vec<String> {
    let clashes = |name: &str| RNI_COLUMNS.contains(&name);
    let left = export.columns().iter().map(|name| {
        if clashes(name.as_str()) {
            suffixed(name, LEFT_SUFFIX)
        } else {
            name.clone()
        }
    });
    let right = RNI_COLUMNS.iter().map(|&name| {
        if export.column_index(name).is_some() {
            suffixed(name, RIGHT_SUFFIX)
        } else {
            name.to_owned()
        }
    });
    left.chain(right).collect()
}

fn join_key(cell: &Cell) -> Option<&str> {
    cell.as_deref().filter(|key| !key.is_empty())
}

fn derive_mxuid(flexnet_id: &Cell, row: usize) -> Result<Mxuid> {
    match flexnet_id {
        None => Ok(Mxuid::MISSING),
        Some(value) => value
            .parse::<Mxuid>()
            .map_err(|_| PipelineError::TypeConversion {
                column: column::FLEXNET_ID.to_owned(),
                value: value.clone(),
                row,
            }),
    }
}
