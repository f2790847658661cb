//! Week navigator: total-week computation, the selector rows, and the
//! prev/next links with their bound checks.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::core::config::CalendarConfig;

/// The currently displayed week window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    /// 1-based week number.
    pub week_number: u32,
    /// Total selectable weeks for the display horizon.
    pub total_weeks: u32,
    /// First date of week 1.
    pub base_date: NaiveDate,
}

impl WeekWindow {
    /// First date of the displayed week.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.base_date + Days::new(u64::from(self.week_number.saturating_sub(1)) * 7)
    }
}

/// One row of the week selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekOption {
    pub week: u32,
    /// Human label, `MM月dd日-MM月dd日` over the week's span.
    pub label: String,
    /// Whether this is the active week.
    pub selected: bool,
    pub url: String,
}

/// A prev/next navigation link; `url` is `None` when out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub enabled: bool,
    pub url: Option<String>,
}

/// Builds week-selector rows and navigation links.
#[derive(Debug, Clone)]
pub struct WeekNavigator {
    window: WeekWindow,
    base_url: String,
    girl_suffix: String,
}

impl WeekNavigator {
    /// Build a navigator for the given configuration.
    #[must_use]
    pub fn new(config: &CalendarConfig) -> Self {
        // The girl id only rides along when the viewed girl is the page's
        // target; otherwise links fall back to the store calendar.
        let girl_suffix = if config.is_girl_view() && config.view.girl_id == config.view.target_id
        {
            config.view.girl_id.clone()
        } else {
            String::new()
        };
        Self {
            window: WeekWindow {
                week_number: config.navigation.current_week,
                total_weeks: config.total_weeks(),
                base_date: config.navigation.base_date,
            },
            base_url: config.endpoints.calendar_base_url.clone(),
            girl_suffix,
        }
    }

    /// The displayed week window.
    #[must_use]
    pub const fn window(&self) -> WeekWindow {
        self.window
    }

    /// Navigation URL for a week: `{base}/{week}/{girl?}`.
    #[must_use]
    pub fn url_for(&self, week: u32) -> String {
        format!("{}/{week}/{}", self.base_url, self.girl_suffix)
    }

    /// Selector rows for every week 1..=total, active week pre-selected.
    #[must_use]
    pub fn options(&self) -> Vec<WeekOption> {
        (1..=self.window.total_weeks)
            .map(|week| {
                let start = self.window.base_date + Days::new(u64::from(week - 1) * 7);
                let end = start + Days::new(6);
                WeekOption {
                    week,
                    label: format!(
                        "{}-{}",
                        start.format("%m月%d日"),
                        end.format("%m月%d日")
                    ),
                    selected: week == self.window.week_number,
                    url: self.url_for(week),
                }
            })
            .collect()
    }

    /// Link to the previous week; disabled on week 1.
    #[must_use]
    pub fn prev(&self) -> NavLink {
        if self.window.week_number == 1 {
            NavLink {
                enabled: false,
                url: None,
            }
        } else {
            NavLink {
                enabled: true,
                url: Some(self.url_for(self.window.week_number - 1)),
            }
        }
    }

    /// Link to the next week; disabled past the horizon.
    #[must_use]
    pub fn next(&self) -> NavLink {
        if self.window.week_number + 1 > self.window.total_weeks {
            NavLink {
                enabled: false,
                url: None,
            }
        } else {
            NavLink {
                enabled: true,
                url: Some(self.url_for(self.window.week_number + 1)),
            }
        }
    }
}
