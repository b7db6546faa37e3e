//! Descriptive statistics over a redacted export.
//!
//! TikTok exports have a well known layout and get a dedicated report; every
//! other platform gets activity-over-time series for each dated list it contains.
//! Sections only appear when the export has the data behind them.

pub mod generic;
pub mod text;
pub mod tiktok;
pub mod time;

use crate::domain::model::Platform;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const ANALYSIS_COMPLETE: &str = "Analysis complete.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Metric { value: Value },
    Series { points: Vec<Point> },
    Table { columns: Vec<String>, rows: Vec<Vec<Value>> },
    Note { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(flatten)]
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub platform: Platform,
    pub sections: Vec<Section>,
}

impl AnalyticsReport {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            sections: Vec::new(),
        }
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn metric(&mut self, title: impl Into<String>, value: impl Into<Value>) {
        self.sections.push(Section {
            title: title.into(),
            body: SectionBody::Metric {
                value: value.into(),
            },
        });
    }

    pub fn series(&mut self, title: impl Into<String>, points: Vec<Point>) {
        self.sections.push(Section {
            title: title.into(),
            body: SectionBody::Series { points },
        });
    }

    pub fn table(&mut self, title: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Value>>) {
        self.sections.push(Section {
            title: title.into(),
            body: SectionBody::Table { columns, rows },
        });
    }

    pub fn note(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.sections.push(Section {
            title: title.into(),
            body: SectionBody::Note { text: text.into() },
        });
    }
}

/// Build the report matching `platform` for a redacted document.
pub fn analyze(platform: Platform, data: &Value) -> AnalyticsReport {
    let mut report = AnalyticsReport::new(platform);
    match platform {
        Platform::TikTok => tiktok::analyze(data, &mut report),
        _ => generic::analyze(data, &mut report),
    }
    report.note("Status", ANALYSIS_COMPLETE);
    tracing::debug!("📊 {} analytics produced {} sections", platform, report.sections.len());
    report
}

/// Follow object keys; `None` as soon as a step is missing or not an object.
pub(crate) fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.as_object()?.get(*key))
}

/// Object rows of a JSON list. Non-object entries carry no columns and are skipped.
pub(crate) fn records(value: Option<&Value>) -> Vec<&Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

/// Union of row keys in order of first appearance.
pub(crate) fn columns(rows: &[&Map<String, Value>]) -> Vec<String> {
    let mut cols: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !cols.iter().any(|c| c == key) {
                cols.push(key.clone());
            }
        }
    }
    cols
}

pub(crate) fn timestamps<'a>(
    rows: &'a [&Map<String, Value>],
    column: &'a str,
) -> impl Iterator<Item = NaiveDateTime> + 'a {
    rows.iter()
        .filter_map(move |row| row.get(column).and_then(time::parse_timestamp))
}

/// Coercing numeric read: numbers and numeric strings.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Row counts per calendar day, oldest first.
pub(crate) fn daily_counts<I: IntoIterator<Item = NaiveDateTime>>(stamps: I) -> Vec<Point> {
    let mut per_day: BTreeMap<chrono::NaiveDate, usize> = BTreeMap::new();
    for ts in stamps {
        *per_day.entry(ts.date()).or_default() += 1;
    }
    per_day
        .into_iter()
        .map(|(day, count)| Point {
            label: day.format("%Y-%m-%d").to_string(),
            value: count as f64,
        })
        .collect()
}

/// Row counts per hour of day, by hour.
pub(crate) fn hourly_counts<I: IntoIterator<Item = NaiveDateTime>>(stamps: I) -> Vec<Point> {
    use chrono::Timelike;

    let mut per_hour: BTreeMap<u32, usize> = BTreeMap::new();
    for ts in stamps {
        *per_hour.entry(ts.hour()).or_default() += 1;
    }
    per_hour
        .into_iter()
        .map(|(hour, count)| Point {
            label: hour.to_string(),
            value: count as f64,
        })
        .collect()
}

pub(crate) fn counts_to_points<T: ToString>(counts: Vec<(T, usize)>) -> Vec<Point> {
    counts
        .into_iter()
        .map(|(label, count)| Point {
            label: label.to_string(),
            value: count as f64,
        })
        .collect()
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub(crate) fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
