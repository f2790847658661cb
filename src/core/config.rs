//! Configuration system: TOML file + env var overrides + smart defaults.
//!
//! Every component that needs a knob takes the relevant section explicitly;
//! nothing reads ambient globals.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::errors::{GridError, Result};

/// Full calendar-engine configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct CalendarConfig {
    pub view: ViewConfig,
    pub policy: ReservationPolicy,
    pub navigation: NavigationConfig,
    pub endpoints: EndpointConfig,
    pub logging: LoggingConfig,
}

/// Whose calendar is being viewed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ViewConfig {
    /// Selected girl id; empty means the store-level calendar.
    pub girl_id: String,
    /// The id the page was opened for; navigation links only carry the girl
    /// id when it matches this target.
    pub target_id: String,
    /// Holiday dates used for day-header tone classification.
    pub holidays: Vec<NaiveDate>,
}

/// How a reservation flow was entered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// Calendar-first flow: pick a slot, then a course.
    #[default]
    CalendarFirst,
    /// Course-first flow: a course is already chosen.
    CourseFirst,
}

/// Business rules altering which slots are bookable and how they display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReservationPolicy {
    /// Free (unassigned) reservation mode.
    pub free_reservation: bool,
    /// Which flow the user entered through.
    pub entry_mode: EntryMode,
    /// Whether the advance-reservation window applies.
    pub advance_reservation: bool,
    /// Lead-time length in days for advance reservations.
    pub advance_days: u32,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            free_reservation: false,
            entry_mode: EntryMode::CalendarFirst,
            advance_reservation: false,
            advance_days: 7,
        }
    }
}

/// Week-window and display-horizon settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Total days the calendar exposes for online reservation.
    pub display_day_horizon: u32,
    /// Currently displayed week, 1-based.
    pub current_week: u32,
    /// First date of week 1.
    pub base_date: NaiveDate,
    /// Minimum row count before a fully-unavailable column shows the
    /// out-of-window notice instead of the bare placeholder.
    pub min_notice_rows: usize,
    /// Notice shown on columns past the reservation window.
    pub overflow_message: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            display_day_horizon: 14,
            current_week: 1,
            base_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            min_notice_rows: 10,
            overflow_message: "ネット予約可能期間外です".to_string(),
        }
    }
}

/// Backend endpoints the core talks to or links out to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL for week navigation: `{base}/{week}/{girl?}`.
    pub calendar_base_url: String,
    /// Time-change proposal endpoint.
    pub proposal_url: String,
    /// Selection submission endpoint.
    pub selection_url: String,
    /// Post-booking confirmation page.
    pub confirm_url: String,
    /// Waitlist landing page for 待 bookings.
    pub waitlist_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            calendar_base_url: "/reserve/calendar".to_string(),
            proposal_url: "/api/time_change_proposal".to_string(),
            selection_url: "/api/selected_list".to_string(),
            confirm_url: "/reserve/select_course".to_string(),
            waitlist_url: "/reserve/waiting_list".to_string(),
        }
    }
}

/// Event-log destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSONL event log path; `None` disables file logging.
    pub jsonl_log: Option<PathBuf>,
}

impl CalendarConfig {
    /// Load config from an explicit path, then apply env overrides.
    ///
    /// `None` uses built-in defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) if p.exists() => {
                let raw = fs::read_to_string(p).map_err(|source| GridError::Io {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str::<Self>(&raw)?
            }
            Some(p) => {
                return Err(GridError::MissingConfig {
                    path: p.to_path_buf(),
                });
            }
            None => Self::default(),
        };

        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Total number of selectable weeks for the configured horizon.
    ///
    /// Closed form of `ceil(horizon / 7)` for `horizon ≥ 1`.
    #[must_use]
    pub const fn total_weeks(&self) -> u32 {
        self.navigation.display_day_horizon.saturating_sub(1) / 7 + 1
    }

    /// Whether a specific girl's calendar (rather than the store's) is shown.
    #[must_use]
    pub fn is_girl_view(&self) -> bool {
        !self.view.girl_id.is_empty()
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        set_env_u32(
            "RGRID_DISPLAY_DAY_HORIZON",
            &mut self.navigation.display_day_horizon,
        )?;
        set_env_u32("RGRID_CURRENT_WEEK", &mut self.navigation.current_week)?;
        set_env_bool(
            "RGRID_FREE_RESERVATION",
            &mut self.policy.free_reservation,
        )?;
        set_env_bool(
            "RGRID_ADVANCE_RESERVATION",
            &mut self.policy.advance_reservation,
        )?;
        set_env_u32("RGRID_ADVANCE_DAYS", &mut self.policy.advance_days)?;
        if let Some(raw) = env_var("RGRID_GIRL_ID") {
            self.view.girl_id = raw;
        }
        Ok(())
    }

    /// Reject configurations the engine cannot run against.
    pub fn validate(&self) -> Result<()> {
        if self.navigation.display_day_horizon == 0 {
            return Err(GridError::InvalidConfig {
                details: "navigation.display_day_horizon must be at least 1".to_string(),
            });
        }
        if self.navigation.current_week == 0 {
            return Err(GridError::InvalidConfig {
                details: "navigation.current_week is 1-based and must be at least 1".to_string(),
            });
        }
        if self.navigation.current_week > self.total_weeks() {
            return Err(GridError::InvalidConfig {
                details: format!(
                    "navigation.current_week {} exceeds total weeks {}",
                    self.navigation.current_week,
                    self.total_weeks()
                ),
            });
        }
        if self.policy.advance_reservation && self.policy.advance_days == 0 {
            return Err(GridError::InvalidConfig {
                details: "policy.advance_days must be at least 1 when advance reservation is on"
                    .to_string(),
            });
        }
        if self.navigation.min_notice_rows == 0 {
            return Err(GridError::InvalidConfig {
                details: "navigation.min_notice_rows must be at least 1".to_string(),
            });
        }
        if self.endpoints.calendar_base_url.is_empty() {
            return Err(GridError::InvalidConfig {
                details: "endpoints.calendar_base_url must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn set_env_u32(name: &str, slot: &mut u32) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = raw.parse().map_err(|_| GridError::InvalidConfig {
            details: format!("{name} must be an unsigned integer, got {raw:?}"),
        })?;
    }
    Ok(())
}

fn set_env_bool(name: &str, slot: &mut bool) -> Result<()> {
    if let Some(raw) = env_var(name) {
        *slot = match raw.as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(GridError::InvalidConfig {
                    details: format!("{name} must be a boolean, got {other:?}"),
                });
            }
        };
    }
    Ok(())
}
