//! Decoding of 4Wings report responses.
//!
//! The report body is an envelope whose `entries` hold one object per
//! requested dataset, keyed by the resolved dataset version:
//!
//! ```json
//! { "total": 2, "nextOffset": null,
//!   "entries": [ { "public-global-fishing-effort:v3.0": [ { "lat": 41.2, ... } ] } ] }
//! ```
//!
//! Rows are checked against the record shape as soon as they arrive, so a
//! provider-side schema change fails here instead of inside a chart.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use shared::FishingActivityRecord;
use std::collections::BTreeMap;

use crate::error::{FetchError, SchemaError};

type Row = Map<String, Value>;

/// Result of a successful report request.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    Data(Vec<FishingActivityRecord>),
    /// The provider answered, but with no rows for the requested window.
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportEnvelope {
    entries: Vec<BTreeMap<String, Option<Vec<Row>>>>,
    #[serde(default)]
    next_offset: Option<Value>,
}

impl ReportEnvelope {
    fn parse(body: &[u8]) -> Result<Self, FetchError> {
        let envelope: ReportEnvelope = serde_json::from_slice(body)?;
        if let Some(next) = envelope.next_offset.as_ref().filter(|v| !v.is_null()) {
            log::warn!(
                "Report is paginated (nextOffset={}), only the first page is used",
                next
            );
        }
        Ok(envelope)
    }

    fn into_rows(self) -> Vec<Row> {
        self.entries
            .into_iter()
            .flat_map(|entry| entry.into_values())
            .flatten()
            .flatten()
            .collect()
    }
}

/// A vessel seen in the area, from a report grouped by vessel id.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct VesselPresence {
    #[serde(alias = "vesselId")]
    pub vessel_id: String,
    #[serde(alias = "shipName", default)]
    pub ship_name: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub mmsi: Option<String>,
    #[serde(alias = "geartype", default)]
    pub gear_type: Option<String>,
    #[serde(default)]
    pub hours: f64,
}

// mmsi comes back as a string or as a bare number depending on the dataset
fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub fn decode_fishing_report(body: &[u8]) -> Result<FetchOutcome, FetchError> {
    let rows = ReportEnvelope::parse(body)?.into_rows();
    if rows.is_empty() {
        return Ok(FetchOutcome::Empty);
    }

    let records = rows
        .iter()
        .enumerate()
        .map(|(i, row)| record_from_row(i, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FetchOutcome::Data(records))
}

pub fn decode_vessel_report(body: &[u8]) -> Result<Vec<VesselPresence>, FetchError> {
    let rows = ReportEnvelope::parse(body)?.into_rows();
    let mut vessels = rows
        .into_iter()
        .map(|row| serde_json::from_value::<VesselPresence>(Value::Object(row)))
        .collect::<Result<Vec<_>, _>>()?;
    vessels.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    Ok(vessels)
}

fn record_from_row(row: usize, values: &Row) -> Result<FishingActivityRecord, SchemaError> {
    let name_field = if values.contains_key("shipName") {
        "shipName"
    } else {
        "vessel_name"
    };
    // blank names are stored as empty CSV fields, which read back as None
    let vessel_name = match values.get(name_field) {
        None | Some(Value::Null) => None,
        Some(_) => Some(string_field(row, values, name_field)?).filter(|n| !n.trim().is_empty()),
    };

    Ok(FishingActivityRecord {
        lat: number_field(row, values, "lat")?,
        lon: number_field(row, values, "lon")?,
        hours: number_field(row, values, "hours")?,
        date: string_field(row, values, "date")?,
        flag: string_field(row, values, "flag")?,
        vessel_name,
    })
}

fn number_field(row: usize, values: &Row, field: &'static str) -> Result<f64, SchemaError> {
    match values.get(field) {
        None => Err(SchemaError::MissingField { row, field }),
        Some(value) => value.as_f64().ok_or_else(|| invalid(row, field, "a number", value)),
    }
}

fn string_field(row: usize, values: &Row, field: &'static str) -> Result<String, SchemaError> {
    match values.get(field) {
        None => Err(SchemaError::MissingField { row, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(value) => Err(invalid(row, field, "a string", value)),
    }
}

fn invalid(row: usize, field: &'static str, expected: &'static str, found: &Value) -> SchemaError {
    SchemaError::InvalidField {
        row,
        field,
        expected,
        found: found.to_string(),
    }
}
