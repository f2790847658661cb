//! Availability grid engine: eligibility rewriting, cell rendering,
//! run-length merging, and week-window navigation.

pub mod eligibility;
pub mod merge;
pub mod navigator;
pub mod render;

use serde::Serialize;

use crate::core::config::CalendarConfig;
use crate::core::errors::GridError;
use crate::feed::parser::parse_feed;
use crate::grid::merge::{NoticeSettings, merge_grid};
use crate::grid::navigator::{NavLink, WeekNavigator, WeekOption, WeekWindow};
use crate::grid::render::{GridRenderer, RenderedGrid};

/// A fully built calendar page: the merged grid plus navigation controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartView {
    #[allow(missing_docs)]
    pub rendered: RenderedGrid,
    #[allow(missing_docs)]
    pub window: WeekWindow,
    /// Week selector rows, active week pre-selected.
    pub options: Vec<WeekOption>,
    #[allow(missing_docs)]
    pub prev: NavLink,
    #[allow(missing_docs)]
    pub next: NavLink,
}

/// What the page shows for a given feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageView {
    /// Normal rendering.
    Chart(Box<ChartView>),
    /// Feed unusable: table head and chart are removed entirely, never
    /// partially rendered. The loading indicator is cleared either way.
    Suppressed {
        /// Stable error code explaining the suppression.
        error_code: String,
        #[allow(missing_docs)]
        details: String,
    },
}

/// Run the full pipeline for one week-window request: parse, apply
/// eligibility, render, merge, and build navigation.
///
/// Grid rebuilds are wholesale — the previous week's cells are discarded,
/// and render + merge complete before this returns, so no caller ever
/// observes a half-merged table.
#[must_use]
pub fn build_page(config: &CalendarConfig, raw_feed: &str) -> PageView {
    let feed = match parse_feed(raw_feed) {
        Ok(feed) => feed,
        Err(error) => return suppressed(&error),
    };

    let mut rendered = GridRenderer::new(config).render(&feed);
    merge_grid(
        &mut rendered.grid,
        &NoticeSettings::from_navigation(&config.navigation),
    );

    let navigator = WeekNavigator::new(config);
    PageView::Chart(Box::new(ChartView {
        rendered,
        window: navigator.window(),
        options: navigator.options(),
        prev: navigator.prev(),
        next: navigator.next(),
    }))
}

fn suppressed(error: &GridError) -> PageView {
    PageView::Suppressed {
        error_code: error.code().to_string(),
        details: error.to_string(),
    }
}
