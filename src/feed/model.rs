//! Status feed data model: marks, slot records, day buckets.

#![allow(missing_docs)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::errors::{GridError, Result};

/// Number of day columns in every feed and every rendered grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Availability symbol carried by a timeslot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mark {
    /// △ — few openings left.
    AvailableLow,
    /// ○ — normal availability.
    AvailableMed,
    /// ◎ — wide open.
    AvailableHigh,
    /// 待 — waitlist notification slot.
    Waitlist,
    /// TEL — bookable by phone only.
    PhoneOnly,
    /// － — placeholder for slots outside the bookable window.
    Unavailable,
    /// Any other label the backend emits (typically ×).
    Closed(String),
}

impl Mark {
    /// Parse a mark from its feed label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "△" => Self::AvailableLow,
            "○" => Self::AvailableMed,
            "◎" => Self::AvailableHigh,
            "待" => Self::Waitlist,
            "TEL" => Self::PhoneOnly,
            "－" => Self::Unavailable,
            other => Self::Closed(other.to_string()),
        }
    }

    /// The exact label the feed/table uses for this mark.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::AvailableLow => "△",
            Self::AvailableMed => "○",
            Self::AvailableHigh => "◎",
            Self::Waitlist => "待",
            Self::PhoneOnly => "TEL",
            Self::Unavailable => "－",
            Self::Closed(text) => text,
        }
    }

    /// Whether this is one of the three availability grades.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(
            self,
            Self::AvailableLow | Self::AvailableMed | Self::AvailableHigh
        )
    }

    /// Whether a click on this mark enters the booking flow.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        self.is_available() || matches!(self, Self::Waitlist)
    }
}

impl From<String> for Mark {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Mark> for String {
    fn from(value: Mark) -> Self {
        value.label().to_string()
    }
}

/// One timeslot entry inside a day bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub mark: Mark,
    /// Start-time annotation (girl calendars only); normalized to `None`
    /// when the feed carries an empty string.
    pub start_time: Option<String>,
    /// System date the slot belongs to.
    pub system_date: NaiveDate,
}

/// One day column: a date and its ordered timeslot records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub slots: Vec<SlotRecord>,
}

/// A validated weekly feed: exactly 7 day buckets with a uniform row grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFeed {
    buckets: Vec<DayBucket>,
}

impl StatusFeed {
    /// Build a feed, enforcing the 7-bucket and uniform-row contract.
    pub fn new(buckets: Vec<DayBucket>) -> Result<Self> {
        if buckets.len() != DAYS_PER_WEEK {
            return Err(GridError::malformed_feed(format!(
                "expected {DAYS_PER_WEEK} day buckets, got {}",
                buckets.len()
            )));
        }
        let rows = buckets[0].slots.len();
        for (index, bucket) in buckets.iter().enumerate() {
            if bucket.slots.len() != rows {
                return Err(GridError::malformed_feed(format!(
                    "bucket {index} ({}) has {} rows, expected {rows}",
                    bucket.date,
                    bucket.slots.len()
                )));
            }
        }
        for (index, pair) in buckets.windows(2).enumerate() {
            if pair[1].date != pair[0].date.succ_opt().unwrap_or(pair[0].date) {
                return Err(GridError::malformed_feed(format!(
                    "bucket {} ({}) does not follow {} by one day",
                    index + 1,
                    pair[1].date,
                    pair[0].date
                )));
            }
        }
        Ok(Self { buckets })
    }

    /// The seven day columns, Monday-agnostic — order is the feed's order.
    #[must_use]
    pub fn days(&self) -> &[DayBucket] {
        &self.buckets
    }

    /// Number of timeslot rows shared by every day column.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.buckets.first().map_or(0, |b| b.slots.len())
    }

    /// First date covered by this feed.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.buckets[0].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(date: NaiveDate, marks: &[&str]) -> DayBucket {
        DayBucket {
            date,
            slots: marks
                .iter()
                .map(|m| SlotRecord {
                    mark: Mark::from_label(m),
                    start_time: None,
                    system_date: date,
                })
                .collect(),
        }
    }

    fn week(start: NaiveDate, marks: &[&str]) -> Vec<DayBucket> {
        (0..7)
            .map(|i| bucket(start + chrono::Days::new(i), marks))
            .collect()
    }

    #[test]
    fn mark_labels_round_trip() {
        for label in ["△", "○", "◎", "待", "TEL", "－", "×"] {
            assert_eq!(Mark::from_label(label).label(), label);
        }
    }

    #[test]
    fn unknown_label_becomes_closed() {
        let mark = Mark::from_label("休");
        assert_eq!(mark, Mark::Closed("休".to_string()));
        assert!(!mark.is_actionable());
    }

    #[test]
    fn actionable_marks() {
        assert!(Mark::AvailableLow.is_actionable());
        assert!(Mark::AvailableMed.is_actionable());
        assert!(Mark::AvailableHigh.is_actionable());
        assert!(Mark::Waitlist.is_actionable());
        assert!(!Mark::PhoneOnly.is_actionable());
        assert!(!Mark::Unavailable.is_actionable());
    }

    #[test]
    fn waitlist_is_actionable_but_not_available() {
        assert!(!Mark::Waitlist.is_available());
        assert!(Mark::Waitlist.is_actionable());
    }

    #[test]
    fn feed_requires_seven_buckets() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut buckets = week(start, &["○"]);
        buckets.pop();
        let err = StatusFeed::new(buckets).unwrap_err();
        assert_eq!(err.code(), "RGD-2001");
    }

    #[test]
    fn feed_requires_uniform_rows() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut buckets = week(start, &["○", "○"]);
        buckets[3].slots.pop();
        let err = StatusFeed::new(buckets).unwrap_err();
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn feed_requires_consecutive_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut buckets = week(start, &["○"]);
        buckets[5].date = start; // duplicate
        assert!(StatusFeed::new(buckets).is_err());
    }

    #[test]
    fn valid_feed_reports_shape() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let feed = StatusFeed::new(week(start, &["○", "△", "×"])).unwrap();
        assert_eq!(feed.days().len(), DAYS_PER_WEEK);
        assert_eq!(feed.rows(), 3);
        assert_eq!(feed.start_date(), start);
    }

    #[test]
    fn mark_serde_uses_labels() {
        let json = serde_json::to_string(&Mark::Waitlist).unwrap();
        assert_eq!(json, "\"待\"");
        let back: Mark = serde_json::from_str("\"TEL\"").unwrap();
        assert_eq!(back, Mark::PhoneOnly);
    }
}
