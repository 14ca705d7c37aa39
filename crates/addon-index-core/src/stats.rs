//! Rendering recorded metric history for export.

use std::fmt;
use std::str::FromStr;

use addon_store::MetricRecord;
use chrono::SecondsFormat;
use serde::Serialize;

use crate::domain::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for StatsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsFormat::Json => write!(f, "json"),
            StatsFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for StatsFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(StatsFormat::Json),
            "csv" => Ok(StatsFormat::Csv),
            other => Err(PipelineError::Config(format!(
                "unknown stats format {other:?} (expected json or csv)"
            ))),
        }
    }
}

#[derive(Serialize)]
struct StatRow<'a> {
    name: &'a str,
    value: u64,
    recorded_at: String,
}

impl<'a> From<&'a MetricRecord> for StatRow<'a> {
    fn from(record: &'a MetricRecord) -> Self {
        Self {
            name: &record.name,
            value: record.value,
            recorded_at: record
                .recorded_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Pretty JSON array of `{ name, value, recorded_at }`, in input order.
pub fn render_json(records: &[MetricRecord]) -> Result<String> {
    let rows: Vec<StatRow<'_>> = records.iter().map(StatRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// CSV with a `name,value,recorded_at` header, in input order.
pub fn render_csv(records: &[MetricRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // An empty history still gets its header row.
    writer.write_record(["name", "value", "recorded_at"])?;
    for record in records {
        let row = StatRow::from(record);
        let value = row.value.to_string();
        writer.write_record([row.name, value.as_str(), row.recorded_at.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PipelineError::Serialization(e.to_string()))
}

pub fn render(records: &[MetricRecord], format: StatsFormat) -> Result<String> {
    match format {
        StatsFormat::Json => render_json(records),
        StatsFormat::Csv => render_csv(records),
    }
}
