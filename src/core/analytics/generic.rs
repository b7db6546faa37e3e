use super::{columns, daily_counts, records, timestamps, AnalyticsReport};
use serde_json::Value;

const DATE_COLUMNS: &[&str] = &["date", "timestamp"];

/// One activity-over-time series per dated list, for any export laid out as
/// `{section: {list_name: [rows...]}}`.
pub fn analyze(data: &Value, report: &mut AnalyticsReport) {
    let Some(sections) = data.as_object() else {
        return;
    };

    for (section, content) in sections {
        let Some(blocks) = content.as_object() else {
            continue;
        };
        for (name, block) in blocks {
            if !block.as_array().is_some_and(|items| !items.is_empty()) {
                continue;
            }
            let rows = records(Some(block));
            let Some(date_col) = columns(&rows)
                .into_iter()
                .find(|c| DATE_COLUMNS.contains(&c.to_lowercase().as_str()))
            else {
                continue;
            };

            let points = daily_counts(timestamps(&rows, &date_col));
            tracing::debug!("{} - {}: {} active days", section, name, points.len());
            report.series(format!("{} - {} Over Time", section, name), points);
        }
    }
}
