//! Shared fixtures: feed payload builders and config builders.

#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::json;

use reservation_grid::core::config::CalendarConfig;

/// First feed date used by every fixture.
pub const FIXTURE_START: &str = "2024-04-01";

/// Build a feed payload from a `rows × 7` mark matrix.
pub fn feed_json(marks: &[Vec<&str>]) -> String {
    feed_json_from(FIXTURE_START, marks)
}

/// Build a feed payload starting at an arbitrary date.
pub fn feed_json_from(start: &str, marks: &[Vec<&str>]) -> String {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").expect("fixture start date");
    let buckets: Vec<serde_json::Value> = (0..7)
        .map(|day| {
            let date = (start + chrono::Days::new(day as u64)).to_string();
            let slots: Vec<serde_json::Value> = marks
                .iter()
                .map(|row| {
                    json!({
                        "acp_status_mark": row[day],
                        "have_start": "",
                        "date": date,
                    })
                })
                .collect();
            json!({ date: slots })
        })
        .collect();
    json!({ "commu_acp_status": buckets }).to_string()
}

/// Default config anchored to the fixture start date.
pub fn fixture_config() -> CalendarConfig {
    let mut cfg = CalendarConfig::default();
    cfg.navigation.base_date =
        NaiveDate::parse_from_str(FIXTURE_START, "%Y-%m-%d").expect("fixture start date");
    cfg
}
