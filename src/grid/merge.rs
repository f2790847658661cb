//! Run-length merger: collapses vertically adjacent identical label cells
//! into spanning cells, and folds fully-unavailable columns together.
//!
//! The merge runs once per label value over the whole table, placeholder
//! first, then TEL. The two labels never co-occur in one cell, so the order
//! does not change the result, but the pass order is fixed and tested so a
//! reordering is a deliberate act. Both passes complete before control
//! returns to the caller — no half-merged grid is ever observable.

use serde::{Deserialize, Serialize};

use crate::core::config::NavigationConfig;
use crate::feed::model::DAYS_PER_WEEK;
use crate::grid::render::{CellContent, CellGrid};

/// Label of slots outside the bookable window.
pub const PLACEHOLDER_LABEL: &str = "－";
/// Label of phone-only slots.
pub const PHONE_LABEL: &str = "TEL";

/// Settings for the fully-unavailable column notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeSettings {
    /// Minimum row count before the notice text replaces the placeholder.
    pub min_notice_rows: usize,
    /// Message shown on columns past the reservation window.
    pub overflow_message: String,
}

impl NoticeSettings {
    /// Extract the relevant knobs from the navigation section.
    #[must_use]
    pub fn from_navigation(navigation: &NavigationConfig) -> Self {
        Self {
            min_notice_rows: navigation.min_notice_rows,
            overflow_message: navigation.overflow_message.clone(),
        }
    }
}

/// Run the complete merge: vertical runs per label, then the horizontal
/// collapse of fully-unavailable columns. Idempotent.
pub fn merge_grid(grid: &mut CellGrid, settings: &NoticeSettings) {
    for label in [PLACEHOLDER_LABEL, PHONE_LABEL] {
        for column in (0..DAYS_PER_WEEK).rev() {
            merge_column(grid, column, label, settings);
        }
    }
    collapse_unavailable_columns(grid);
}

/// Whether the cell at `(row, column)` is a plain label cell with this text.
fn has_label(grid: &CellGrid, row: usize, column: usize, label: &str) -> bool {
    grid.cell(row, column)
        .is_some_and(|cell| matches!(&cell.content, CellContent::Label(text) if text == label))
}

/// Merge one label's vertical runs within one column.
fn merge_column(grid: &mut CellGrid, column: usize, label: &str, settings: &NoticeSettings) {
    let rows = grid.rows();
    let mut anchor_row = 0usize;
    let mut run_len = 0usize;

    for row in 0..rows {
        if has_label(grid, row, column, label) {
            if run_len == 0 {
                anchor_row = row;
            }
            run_len += 1;
        } else {
            run_len = 0;
            continue;
        }

        if run_len >= 2 {
            grid.take_cell(row, column);
            if let Some(anchor) = grid.cell_mut(anchor_row, column) {
                anchor.row_span = run_len;
                anchor.merged_label = Some(label.to_string());
            }
        } else if let Some(anchor) = grid.cell_mut(anchor_row, column) {
            // Singleton runs carry the same label metadata as spans.
            anchor.merged_label = Some(label.to_string());
        }
    }

    // A placeholder run covering the whole column flags the anchor; the
    // notice text only applies once the grid is tall enough.
    if label == PLACEHOLDER_LABEL && run_len == rows && rows > 0 {
        let notice = if rows >= settings.min_notice_rows {
            settings.overflow_message.clone()
        } else {
            PLACEHOLDER_LABEL.to_string()
        };
        if let Some(anchor) = grid.cell_mut(anchor_row, column) {
            anchor.column_all_unavailable = true;
            anchor.overflow_notice = Some(notice);
        }
    }
}

/// Fold every fully-unavailable column after the first into the first via
/// `col_span`; only the first keeps its notice text.
fn collapse_unavailable_columns(grid: &mut CellGrid) {
    let rows = grid.rows();
    let mut first: Option<(usize, usize)> = None;

    for column in 0..DAYS_PER_WEEK {
        let Some(row) = (0..rows)
            .find(|&row| grid.cell(row, column).is_some_and(|c| c.column_all_unavailable))
        else {
            continue;
        };
        if let Some((first_row, first_column)) = first {
            grid.take_cell(row, column);
            if let Some(anchor) = grid.cell_mut(first_row, first_column) {
                anchor.col_span += 1;
            }
        } else {
            first = Some((row, column));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CalendarConfig;
    use crate::feed::model::{DayBucket, Mark, SlotRecord, StatusFeed};
    use crate::grid::render::GridRenderer;
    use chrono::NaiveDate;

    fn settings() -> NoticeSettings {
        NoticeSettings {
            min_notice_rows: 3,
            overflow_message: "out of window".to_string(),
        }
    }

    fn grid_from(rows: &[[&str; 7]]) -> CellGrid {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let buckets = (0..7)
            .map(|day| {
                let date = start + chrono::Days::new(day as u64);
                DayBucket {
                    date,
                    slots: rows
                        .iter()
                        .map(|row| SlotRecord {
                            mark: Mark::from_label(row[day]),
                            start_time: None,
                            system_date: date,
                        })
                        .collect(),
                }
            })
            .collect();
        let feed = StatusFeed::new(buckets).unwrap();
        GridRenderer::new(&CalendarConfig::default())
            .render(&feed)
            .grid
    }

    #[test]
    fn adjacent_placeholders_merge_into_span() {
        let mut grid = grid_from(&[
            ["○", "－", "○", "○", "○", "○", "○"],
            ["○", "－", "○", "○", "○", "○", "○"],
            ["○", "－", "○", "○", "○", "○", "○"],
            ["○", "○", "○", "○", "○", "○", "○"],
        ]);
        merge_grid(&mut grid, &settings());

        let anchor = grid.cell(0, 1).expect("anchor survives");
        assert_eq!(anchor.row_span, 3);
        assert_eq!(anchor.merged_label.as_deref(), Some("－"));
        assert!(!anchor.column_all_unavailable);
        assert!(grid.cell(1, 1).is_none());
        assert!(grid.cell(2, 1).is_none());
        assert!(grid.cell(3, 1).is_some());
    }

    #[test]
    fn singleton_gets_label_metadata_without_span() {
        let mut grid = grid_from(&[
            ["○", "TEL", "○", "○", "○", "○", "○"],
            ["○", "○", "○", "○", "○", "○", "○"],
        ]);
        merge_grid(&mut grid, &settings());

        let cell = grid.cell(0, 1).unwrap();
        assert_eq!(cell.row_span, 1);
        assert_eq!(cell.merged_label.as_deref(), Some("TEL"));
    }

    #[test]
    fn separate_runs_stay_separate() {
        let mut grid = grid_from(&[
            ["－", "○", "○", "○", "○", "○", "○"],
            ["－", "○", "○", "○", "○", "○", "○"],
            ["○", "○", "○", "○", "○", "○", "○"],
            ["－", "○", "○", "○", "○", "○", "○"],
            ["－", "○", "○", "○", "○", "○", "○"],
        ]);
        merge_grid(&mut grid, &settings());

        assert_eq!(grid.cell(0, 0).unwrap().row_span, 2);
        assert!(grid.cell(1, 0).is_none());
        assert_eq!(grid.cell(3, 0).unwrap().row_span, 2);
        assert!(grid.cell(4, 0).is_none());
        assert!(!grid.cell(0, 0).unwrap().column_all_unavailable);
    }

    #[test]
    fn actionable_cells_never_merge() {
        let mut grid = grid_from(&[
            ["○", "○", "○", "○", "○", "○", "○"],
            ["○", "○", "○", "○", "○", "○", "○"],
        ]);
        merge_grid(&mut grid, &settings());
        assert_eq!(grid.iter_cells().count(), 14);
        for (_, _, cell) in grid.iter_cells() {
            assert_eq!(cell.row_span, 1);
            assert_eq!(cell.merged_label, None);
        }
    }

    #[test]
    fn full_column_sets_flag_and_notice() {
        let mut grid = grid_from(&[
            ["○", "○", "○", "○", "○", "○", "－"],
            ["○", "○", "○", "○", "○", "○", "－"],
            ["○", "○", "○", "○", "○", "○", "－"],
        ]);
        merge_grid(&mut grid, &settings());

        let anchor = grid.cell(0, 6).unwrap();
        assert!(anchor.column_all_unavailable);
        assert_eq!(anchor.row_span, 3);
        // rows == min_notice_rows, so the message applies.
        assert_eq!(anchor.overflow_notice.as_deref(), Some("out of window"));
    }

    #[test]
    fn short_grid_keeps_placeholder_as_notice() {
        let mut grid = grid_from(&[
            ["○", "○", "○", "○", "○", "○", "－"],
            ["○", "○", "○", "○", "○", "○", "－"],
        ]);
        merge_grid(&mut grid, &settings());

        let anchor = grid.cell(0, 6).unwrap();
        assert!(anchor.column_all_unavailable);
        assert_eq!(anchor.overflow_notice.as_deref(), Some("－"));
    }

    #[test]
    fn full_tel_column_is_not_flagged() {
        let mut grid = grid_from(&[
            ["○", "○", "○", "○", "○", "○", "TEL"],
            ["○", "○", "○", "○", "○", "○", "TEL"],
            ["○", "○", "○", "○", "○", "○", "TEL"],
        ]);
        merge_grid(&mut grid, &settings());

        let anchor = grid.cell(0, 6).unwrap();
        assert_eq!(anchor.row_span, 3);
        assert!(!anchor.column_all_unavailable);
        assert_eq!(anchor.overflow_notice, None);
    }

    #[test]
    fn multiple_unavailable_columns_collapse_into_first() {
        let mut grid = grid_from(&[
            ["○", "○", "○", "○", "－", "－", "－"],
            ["○", "○", "○", "○", "－", "－", "－"],
            ["○", "○", "○", "○", "－", "－", "－"],
        ]);
        merge_grid(&mut grid, &settings());

        let anchor = grid.cell(0, 4).unwrap();
        assert_eq!(anchor.col_span, 3);
        assert_eq!(anchor.row_span, 3);
        assert_eq!(anchor.overflow_notice.as_deref(), Some("out of window"));
        assert!(grid.cell(0, 5).is_none());
        assert!(grid.cell(0, 6).is_none());
        assert_eq!(grid.covered_area(), 21);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut grid = grid_from(&[
            ["－", "TEL", "○", "－", "－", "－", "－"],
            ["－", "TEL", "○", "－", "－", "－", "－"],
            ["○", "TEL", "－", "－", "－", "－", "－"],
            ["－", "○", "－", "－", "－", "－", "－"],
        ]);
        merge_grid(&mut grid, &settings());
        let once = grid.clone();
        merge_grid(&mut grid, &settings());
        assert_eq!(grid, once);
    }

    #[test]
    fn area_is_conserved() {
        let mut grid = grid_from(&[
            ["－", "TEL", "○", "×", "－", "待", "－"],
            ["－", "TEL", "○", "×", "－", "待", "－"],
            ["TEL", "－", "△", "×", "－", "◎", "－"],
        ]);
        assert_eq!(grid.covered_area(), 21);
        merge_grid(&mut grid, &settings());
        assert_eq!(grid.covered_area(), 21);
    }
}
