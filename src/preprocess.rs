//! Prepare both extracts for the join.

use crate::core::column;
use crate::{normalize_meter_id, Result, Stage, Table};

/// Normalize the RNI `Meter ID` column to digits only, and drop the Export coordinates which are
/// taken from the RNI extract instead.
///
/// Both join keys are kept as text: `00123` and `123` are different meters.
pub fn preprocess(mut export: Table, mut rni: Table) -> Result<(Table, Table)> {
    export.require_column(column::SERIAL_NUMBER, Stage::Preprocess)?;
    let meter_id = rni.require_column(column::METER_ID, Stage::Preprocess)?;

    rni.map_column(meter_id, |cell| {
        Some(normalize_meter_id(cell.as_deref().unwrap_or_default()))
    });

    for name in [column::LATITUDE, column::LONGITUDE] {
        if export.drop_column(name) {
            tracing::debug!(column = name, "dropped export column");
        }
    }

    Ok((export, rni))
}
