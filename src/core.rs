//! Core types used when building an upload file.

use serde::Serialize;

/// Column names of the Export and RNI extracts, and of the upload file.
pub mod column {
    pub const SERIAL_NUMBER: &str = "SerialNumber";
    pub const METER_CON_ID: &str = "MeterConID";
    pub const REGISTER_ID: &str = "RegisterId";
    pub const ROUTE_NUMBER: &str = "RouteNumber";
    pub const LOCATION: &str = "Location";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const METER_ID: &str = "Meter ID";
    pub const FLEXNET_ID: &str = "FlexNet ID";
    pub const MXUID: &str = "MXUID";
}

/// Meter connection ids are zero-padded on the left to at least 10 characters. Longer ids are
/// kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeterConId(String);

impl MeterConId {
    pub const WIDTH: usize = 10;

    pub fn new(raw: &str) -> Self {
        Self(format!("{:0>width$}", raw, width = Self::WIDTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeterConId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Route numbers are expected to carry an `S` somewhere, e.g: `S4`. Any value without one gets
/// it prepended.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteNumber(String);

impl RouteNumber {
    pub fn new(raw: &str) -> Self {
        if raw.contains('S') {
            Self(raw.to_owned())
        } else {
            Self(format!("S{raw}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RouteNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Numeric device identifier, taken from the RNI `FlexNet ID`.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct Mxuid(pub i64);

impl Mxuid {
    /// Used in place of a missing `FlexNet ID`.
    pub const MISSING: Self = Self(0);
}

/// Integers are read as-is. Decimal values, e.g: `555.0` from a spreadsheet export, are truncated
/// toward zero.
impl std::str::FromStr for Mxuid {
    type Err = crate::ParseMxuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self(id));
        }
        match s.parse::<f64>() {
            Ok(id) if id.is_finite() && id.trunc().abs() < i64::MAX as f64 => {
                Ok(Self(id.trunc() as i64))
            }
            _ => Err(crate::ParseMxuidError(s.to_owned())),
        }
    }
}

impl std::fmt::Display for Mxuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
