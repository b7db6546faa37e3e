use super::text::{contains_word, top_words, value_counts};
use super::time::{hours, week_ending_sunday};
use super::{
    as_number, columns, counts_to_points, daily_counts, hourly_counts, lookup, mean, records,
    round_to, timestamps, AnalyticsReport, Point,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const TEXT_COLUMNS: &[&str] = &["desc", "description", "caption", "content"];

pub fn analyze(data: &Value, report: &mut AnalyticsReport) {
    let comments = records(lookup(data, &["Comment", "Comments", "CommentsList"]));
    comment_sections(&comments, report);

    let posts = records(lookup(data, &["Post", "Posts", "VideoList"]));
    post_sections(&posts, comments.len(), report);

    hashtag_section(data, report);

    if let Some(total) = lookup(
        data,
        &[
            "Your Activity",
            "Activity Summary",
            "ActivitySummaryMap",
            "videosWatchedToTheEndSinceAccountRegistration",
        ],
    )
    .filter(|v| !v.is_null())
    {
        report.metric("Total Videos Watched", total.clone());
    }

    let history = records(lookup(
        data,
        &["Your Activity", "Video Watch History", "VideoWatchHistoryList"],
    ));
    watch_sections(&history, report);
}

fn comment_sections(comments: &[&Map<String, Value>], report: &mut AnalyticsReport) {
    if comments.is_empty() {
        return;
    }

    report.metric("Total Comments", comments.len());

    let stamps: Vec<NaiveDateTime> = timestamps(comments, "date").collect();
    let per_day = daily_counts(stamps.iter().copied());
    if !per_day.is_empty() {
        report.series("Comments Over Time", per_day);
    }

    let texts: Vec<&str> = comments
        .iter()
        .filter_map(|c| c.get("comment").and_then(Value::as_str))
        .collect();
    if let Some(avg) = mean(texts.iter().map(|t| t.chars().count() as f64)) {
        report.metric("Avg Comment Length", round_to(avg, 1));
    }

    if !stamps.is_empty() {
        let weekdays = value_counts(stamps.iter().map(|ts| ts.format("%A").to_string()));
        report.series("Comments by Weekday", counts_to_points(weekdays));
    }

    let words = top_words(texts.iter().copied(), 10);
    if !words.is_empty() {
        report.series("Top Comment Words", counts_to_points(words));
    }
}

fn post_sections(posts: &[&Map<String, Value>], comment_count: usize, report: &mut AnalyticsReport) {
    if posts.is_empty() {
        return;
    }

    report.metric("Total Posts", posts.len());

    let likes: Vec<Option<f64>> = posts
        .iter()
        .map(|p| p.get("Likes").and_then(as_number))
        .collect();
    let stamps: Vec<Option<NaiveDateTime>> = posts
        .iter()
        .map(|p| p.get("Date").and_then(super::time::parse_timestamp))
        .collect();

    let mut weekly: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (ts, like) in stamps.iter().zip(&likes) {
        if let (Some(ts), Some(like)) = (ts, like) {
            weekly.entry(week_ending_sunday(ts.date())).or_default().push(*like);
        }
    }
    if !weekly.is_empty() {
        let points = weekly
            .into_iter()
            .filter_map(|(week, values)| {
                mean(values).map(|value| Point {
                    label: week.format("%Y-%m-%d").to_string(),
                    value,
                })
            })
            .collect();
        report.series("Weekly Likes Trend", points);
    }

    let by_hour = hourly_counts(stamps.iter().flatten().copied());
    if !by_hour.is_empty() {
        report.series("Posts by Hour of Day", by_hour);
    }

    if comment_count > 0 {
        report.metric(
            "Comments per Post",
            round_to(comment_count as f64 / posts.len() as f64, 2),
        );
    }

    let Some(text_col) = columns(posts)
        .into_iter()
        .find(|c| TEXT_COLUMNS.contains(&c.to_lowercase().as_str()))
    else {
        return;
    };

    let texts: Vec<Option<&str>> = posts
        .iter()
        .map(|p| p.get(&text_col).and_then(Value::as_str))
        .collect();
    let words = top_words(texts.iter().flatten().copied(), 10);
    if words.is_empty() {
        return;
    }

    let topics: Vec<String> = words.iter().take(5).map(|(w, _)| w.clone()).collect();
    report.series("Top Post Words", counts_to_points(words));

    let rows = topics
        .into_iter()
        .map(|topic| {
            let matching = texts
                .iter()
                .zip(&likes)
                .filter(|(text, _)| text.is_some_and(|t| contains_word(t, &topic)))
                .filter_map(|(_, like)| *like);
            let avg = mean(matching).map(|m| Value::from(round_to(m, 1)));
            vec![Value::String(topic), avg.unwrap_or(Value::Null)]
        })
        .collect();
    report.table(
        "Average Likes per Topic",
        vec!["topic".to_string(), "avg_likes".to_string()],
        rows,
    );
}

fn hashtag_section(data: &Value, report: &mut AnalyticsReport) {
    let tags = records(lookup(data, &["Hashtag", "HashtagList"]));
    let names = tags.iter().filter_map(|t| match t.get("HashtagName") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    });
    let mut counts = value_counts(names);
    counts.truncate(5);
    if !counts.is_empty() {
        report.series("Top Hashtags", counts_to_points(counts));
    }
}

fn watch_sections(history: &[&Map<String, Value>], report: &mut AnalyticsReport) {
    if history.is_empty() {
        return;
    }

    let Some(time_col) = columns(history).into_iter().find(|c| {
        let lower = c.to_lowercase();
        lower.contains("date") || lower.contains("time")
    }) else {
        return;
    };

    let stamps: Vec<NaiveDateTime> = timestamps(history, &time_col).collect();
    let (Some(first), Some(last)) = (stamps.iter().min(), stamps.iter().max()) else {
        return;
    };

    report.metric("Longest Session (h)", round_to(hours(*last - *first), 2));

    let mut per_day: BTreeMap<NaiveDate, (NaiveDateTime, NaiveDateTime)> = BTreeMap::new();
    for ts in &stamps {
        per_day
            .entry(ts.date())
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(*ts);
                *hi = (*hi).max(*ts);
            })
            .or_insert((*ts, *ts));
    }
    if let Some(avg) = mean(per_day.values().map(|(lo, hi)| hours(*hi - *lo))) {
        report.metric("Average Session (h)", round_to(avg, 2));
    }

    report.series("Video Watches by Hour", hourly_counts(stamps.iter().copied()));
}
