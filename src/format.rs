//! Project the merged table onto the upload file layout.

use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::core::{column, MeterConId, Mxuid, RouteNumber};
use crate::{Cell, PipelineError, Result, Stage, Table};

/// Columns of the upload file, in order.
pub const OUTPUT_COLUMNS: [&str; 8] = [
    column::METER_CON_ID,
    column::METER_ID,
    column::MXUID,
    column::REGISTER_ID,
    column::ROUTE_NUMBER,
    column::LATITUDE,
    column::LONGITUDE,
    column::LOCATION,
];

/// Written in place of a missing `RegisterId`.
pub const MISSING_REGISTER_ID: &str = "-";
/// Written in place of a missing `Location`.
pub const MISSING_LOCATION: &str = "NA";

/// A single row of the upload file. Field order matches [OUTPUT_COLUMNS].
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    #[serde(rename = "MeterConID")]
    #[serde_as(as = "DisplayFromStr")]
    pub meter_con_id: MeterConId,
    #[serde(rename = "Meter ID")]
    pub meter_id: Option<String>,
    #[serde(rename = "MXUID")]
    pub mxuid: Mxuid,
    #[serde(rename = "RegisterId")]
    pub register_id: String,
    #[serde(rename = "RouteNumber")]
    #[serde_as(as = "DisplayFromStr")]
    pub route_number: RouteNumber,
    #[serde(rename = "Latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<String>,
    #[serde(rename = "Location")]
    pub location: String,
}

/// Build one [UploadRecord] per merged row.
pub fn format(merged: &Table) -> Result<Vec<UploadRecord>> {
    let mut indices = [0; OUTPUT_COLUMNS.len()];
    for (index, name) in indices.iter_mut().zip(OUTPUT_COLUMNS) {
        *index = merged.require_column(name, Stage::Format)?;
    }
    let [meter_con_id, meter_id, mxuid, register_id, route_number, latitude, longitude, location] =
        indices;

    merged
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| -> Result<UploadRecord> {
            Ok(UploadRecord {
                meter_con_id: MeterConId::new(text(&cells[meter_con_id])),
                meter_id: cells[meter_id].clone(),
                mxuid: parse_mxuid(&cells[mxuid], row)?,
                register_id: or_default(&cells[register_id], MISSING_REGISTER_ID),
                route_number: RouteNumber::new(text(&cells[route_number])),
                latitude: cells[latitude].clone(),
                longitude: cells[longitude].clone(),
                location: or_default(&cells[location], MISSING_LOCATION),
            })
        })
        .collect()
}

fn text(cell: &Cell) -> &str {
    cell.as_deref().unwrap_or_default()
}

fn or_default(cell: &Cell, default: &str) -> String {
    cell.as_deref().unwrap_or(default).to_owned()
}

fn parse_mxuid(cell: &Cell, row: usize) -> Result<Mxuid> {
    let value = text(cell);
    value.parse::<Mxuid>().map_err(|_| PipelineError::TypeConversion {
        column: column::MXUID.to_owned(),
        value: value.to_owned(),
        row,
    })
}
