//! Raw payload parsing for the weekly status feed.
//!
//! The backend embeds a JSON document of the shape
//! `{"commu_acp_status": [ { "<date>": [ {slot}, ... ] }, × 7 ]}` in the page
//! before the engine runs. Parsing succeeds only for exactly seven buckets
//! with a uniform row grid; anything else is a [`GridError::MalformedFeed`]
//! and the caller renders the suppressed no-chart state. The feed is fetched
//! once per navigation — there is no retry path.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::errors::{GridError, Result};
use crate::feed::model::{DayBucket, Mark, SlotRecord, StatusFeed};

/// Feed date format, e.g. `2024-04-01`.
pub const FEED_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct RawPayload {
    commu_acp_status: Option<Vec<BTreeMap<String, Vec<RawSlot>>>>,
}

#[derive(Debug, Deserialize)]
struct RawSlot {
    acp_status_mark: String,
    #[serde(default)]
    have_start: Option<String>,
    date: String,
}

/// Parse a raw JSON payload into a validated [`StatusFeed`].
pub fn parse_feed(raw: &str) -> Result<StatusFeed> {
    let payload: RawPayload = serde_json::from_str(raw)?;
    feed_from_payload(payload)
}

/// Parse an already-decoded JSON value into a validated [`StatusFeed`].
pub fn parse_feed_value(value: serde_json::Value) -> Result<StatusFeed> {
    let payload: RawPayload = serde_json::from_value(value)?;
    feed_from_payload(payload)
}

fn feed_from_payload(payload: RawPayload) -> Result<StatusFeed> {
    let raw_buckets = payload
        .commu_acp_status
        .ok_or_else(|| GridError::malformed_feed("missing commu_acp_status"))?;

    let mut buckets = Vec::with_capacity(raw_buckets.len());
    for (index, raw_bucket) in raw_buckets.into_iter().enumerate() {
        if raw_bucket.len() != 1 {
            return Err(GridError::malformed_feed(format!(
                "bucket {index} must hold exactly one date key, got {}",
                raw_bucket.len()
            )));
        }
        let (date_key, raw_slots) = raw_bucket
            .into_iter()
            .next()
            .ok_or_else(|| GridError::malformed_feed(format!("bucket {index} is empty")))?;
        let date = parse_date(&date_key)?;

        let mut slots = Vec::with_capacity(raw_slots.len());
        for raw_slot in raw_slots {
            slots.push(SlotRecord {
                mark: Mark::from_label(&raw_slot.acp_status_mark),
                start_time: raw_slot.have_start.filter(|s| !s.is_empty()),
                system_date: parse_date(&raw_slot.date)?,
            });
        }
        buckets.push(DayBucket { date, slots });
    }

    StatusFeed::new(buckets)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, FEED_DATE_FORMAT).map_err(|e| GridError::DateParse {
        value: value.to_string(),
        details: e.to_string(),
    })
}
