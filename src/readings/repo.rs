use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::sheets::SheetsClient;

/// Whole-column range of the readings table.
pub const READINGS_RANGE: &str = "SugarReadings!A:E";

/// Category of a glucose reading. Lowercase on the wire and in the
/// sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    Fasting,
    Evening,
    Night,
}

impl ReadingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingKind::Fasting => "fasting",
            ReadingKind::Evening => "evening",
            ReadingKind::Night => "night",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "fasting" => Some(ReadingKind::Fasting),
            "evening" => Some(ReadingKind::Evening),
            "night" => Some(ReadingKind::Night),
            _ => None,
        }
    }

    /// Clock time assumed when a reading is submitted without one.
    pub fn default_time(self) -> &'static str {
        match self {
            ReadingKind::Fasting => "08:00",
            ReadingKind::Evening => "18:00",
            ReadingKind::Night => "22:00",
        }
    }
}

/// One row of the `SugarReadings` sheet, minus the owner column.
/// Append-only; readings are never updated or deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Reading {
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: ReadingKind,
    pub value: f64,
}

impl Reading {
    /// Parse a raw sheet row for the given owner. Rows with missing
    /// columns, an unknown category, or a non-numeric value are
    /// rejected here rather than leaking partial readings downstream.
    fn from_row(row: &[String]) -> Option<Reading> {
        let [_user_id, date, time, kind, value] = row else {
            return None;
        };
        Some(Reading {
            date: date.clone(),
            time: time.clone(),
            kind: ReadingKind::parse(kind)?,
            value: value.parse().ok()?,
        })
    }
}

/// Append one reading row for `user_id`.
pub async fn append(
    sheets: &dyn SheetsClient,
    user_id: &str,
    reading: &Reading,
) -> anyhow::Result<()> {
    let row = vec![
        user_id.to_string(),
        reading.date.clone(),
        reading.time.clone(),
        reading.kind.as_str().to_string(),
        reading.value.to_string(),
    ];
    sheets
        .append_row(READINGS_RANGE, row)
        .await
        .context("append reading row")
}

/// Fetch the whole readings table and keep the rows owned by
/// `user_id`. Always a full scan; the sheet is small enough that this
/// is the intended access pattern.
///
/// A store failure degrades to an empty list to keep the public
/// contract; the log line below is what distinguishes an outage from a
/// user with no data.
pub async fn list_for_user(sheets: &dyn SheetsClient, user_id: &str) -> Vec<Reading> {
    let rows = match sheets.get_rows(READINGS_RANGE).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "reading list degraded to empty by store failure");
            return Vec::new();
        }
    };

    let mut readings = Vec::new();
    for row in rows
        .iter()
        .filter(|row| row.first().map(String::as_str) == Some(user_id))
    {
        match Reading::from_row(row) {
            Some(reading) => readings.push(reading),
            None => warn!(columns = row.len(), "skipping malformed reading row"),
        }
    }
    readings
}
