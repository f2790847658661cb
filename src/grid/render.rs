//! Grid renderer: pure transformation from a validated feed into the
//! 7-day × N-timeslot cell model.
//!
//! Rendering is a full rebuild on every navigation. The cell model carries
//! all data the view needs (mark, hidden system date, annotation) so the
//! presentation layer never doubles as a data store.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::core::config::CalendarConfig;
use crate::feed::model::{DAYS_PER_WEEK, Mark, StatusFeed};
use crate::grid::eligibility::{EligibilityEngine, EligibleSlot};

/// Japanese single-kanji weekday label.
#[must_use]
pub const fn weekday_kanji(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

/// Tone classification for a day header (presentation values are the view's
/// concern; the classification itself is data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayTone {
    Holiday,
    Saturday,
    Sunday,
    Weekday,
}

/// Header of one day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayHeader {
    pub date: NaiveDate,
    /// Day-of-month shown in the header cell.
    pub day_of_month: u32,
    /// Kanji weekday label shown beneath it.
    pub weekday_label: &'static str,
    pub tone: DayTone,
}

#[allow(missing_docs)]
impl DayHeader {
    #[must_use]
    pub fn new(date: NaiveDate, holidays: &[NaiveDate]) -> Self {
        let tone = if holidays.contains(&date) {
            DayTone::Holiday
        } else {
            match date.weekday() {
                Weekday::Sat => DayTone::Saturday,
                Weekday::Sun => DayTone::Sunday,
                _ => DayTone::Weekday,
            }
        };
        Self {
            date,
            day_of_month: date.day(),
            weekday_label: weekday_kanji(date.weekday()),
            tone,
        }
    }
}

/// What a rendered cell shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellContent {
    /// Clickable marker carrying the mark, its hidden system date, and the
    /// optional start-time annotation.
    Actionable {
        mark: Mark,
        advance: bool,
        system_date: NaiveDate,
        start_time: Option<String>,
    },
    /// Plain label cell (TEL / placeholder / closed text), subject to merging.
    Label(String),
}

/// One cell of the rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    pub content: CellContent,
    /// Vertical span after merging; always ≥ 1.
    pub row_span: usize,
    /// Horizontal span after fully-unavailable column collapse; always ≥ 1.
    pub col_span: usize,
    /// Label metadata set by the merge pass on spans and singletons alike,
    /// so styling treats both uniformly.
    pub merged_label: Option<String>,
    /// True when one merge run covers this entire column.
    pub column_all_unavailable: bool,
    /// Notice carried by a fully-unavailable column anchor.
    pub overflow_notice: Option<String>,
}

impl RenderedCell {
    /// Cell whose slot can be clicked into the booking flow.
    #[must_use]
    pub fn actionable(slot: EligibleSlot) -> Self {
        Self {
            content: CellContent::Actionable {
                mark: slot.mark,
                advance: slot.advance,
                system_date: slot.system_date,
                start_time: slot.start_time,
            },
            row_span: 1,
            col_span: 1,
            merged_label: None,
            column_all_unavailable: false,
            overflow_notice: None,
        }
    }

    /// Plain label cell.
    #[must_use]
    pub const fn label(text: String) -> Self {
        Self {
            content: CellContent::Label(text),
            row_span: 1,
            col_span: 1,
            merged_label: None,
            column_all_unavailable: false,
            overflow_notice: None,
        }
    }

    /// The text the merge pass compares; actionable cells use their display
    /// label and therefore never match the TEL/placeholder passes.
    #[must_use]
    pub fn label_text(&self) -> String {
        match &self.content {
            CellContent::Actionable { mark, advance, .. } => {
                if *advance {
                    format!("{}\n{}", mark.label(), crate::grid::eligibility::ADVANCE_TAG)
                } else {
                    mark.label().to_string()
                }
            }
            CellContent::Label(text) => text.clone(),
        }
    }
}

/// The cell table: `rows × 7` slots, `None` where a merge absorbed a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellGrid {
    rows: usize,
    cells: Vec<Vec<Option<RenderedCell>>>,
}

#[allow(missing_docs)]
impl CellGrid {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&RenderedCell> {
        self.cells.get(row).and_then(|r| r.get(column))?.as_ref()
    }

    pub(crate) fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut RenderedCell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(column))?.as_mut()
    }

    pub(crate) fn take_cell(&mut self, row: usize, column: usize) -> Option<RenderedCell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(column))?.take()
    }

    /// Iterate surviving cells with their positions.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &RenderedCell)> {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.as_ref().map(|c| (row, col, c)))
        })
    }

    /// Sum of `row_span × col_span` over surviving cells; merge passes must
    /// keep this equal to `rows × 7`.
    #[must_use]
    pub fn covered_area(&self) -> usize {
        self.iter_cells()
            .map(|(_, _, cell)| cell.row_span * cell.col_span)
            .sum()
    }
}

/// A fully rendered week: day headers plus the cell table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedGrid {
    pub headers: Vec<DayHeader>,
    pub grid: CellGrid,
}

/// Builds the rendered grid from a validated feed.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    engine: EligibilityEngine,
    holidays: Vec<NaiveDate>,
}

impl GridRenderer {
    /// Build a renderer for the given configuration.
    #[must_use]
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            engine: EligibilityEngine::new(config),
            holidays: config.view.holidays.clone(),
        }
    }

    /// Render the full `rows × 7` grid. Always a from-scratch build; the
    /// previous week's cells are never patched.
    #[must_use]
    pub fn render(&self, feed: &StatusFeed) -> RenderedGrid {
        let headers = feed
            .days()
            .iter()
            .map(|bucket| DayHeader::new(bucket.date, &self.holidays))
            .collect();

        let rows = feed.rows();
        let mut cells = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut line = Vec::with_capacity(DAYS_PER_WEEK);
            for (column, bucket) in feed.days().iter().enumerate() {
                let slot = self.engine.resolve(&bucket.slots[row], column);
                let cell = if slot.mark.is_actionable() {
                    RenderedCell::actionable(slot)
                } else {
                    RenderedCell::label(slot.mark.label().to_string())
                };
                line.push(Some(cell));
            }
            cells.push(line);
        }

        RenderedGrid {
            headers,
            grid: CellGrid { rows, cells },
        }
    }
}
