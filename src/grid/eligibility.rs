//! Eligibility rule engine: rewrites each slot's displayable mark according
//! to the free-reservation and advance-reservation policies.
//!
//! Rules are applied per slot in day-major order. The engine is pure: it
//! reads only the configuration given at construction and the slot itself.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::config::{CalendarConfig, EntryMode, ReservationPolicy};
use crate::feed::model::{Mark, SlotRecord};

/// Display suffix appended to advance-only availability marks.
pub const ADVANCE_TAG: &str = "先行";

/// A slot after eligibility rewriting, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibleSlot {
    /// Mark after any free-reservation collapse.
    pub mark: Mark,
    /// Whether the advance-reservation tag applies.
    pub advance: bool,
    /// Start-time annotation, blanked unless a girl calendar is shown.
    pub start_time: Option<String>,
    /// System date carried through to the rendered cell.
    pub system_date: NaiveDate,
}

impl EligibleSlot {
    /// The label shown in the cell; advance-only marks carry the tag on a
    /// second line, exactly as the table displays them.
    #[must_use]
    pub fn display_label(&self) -> String {
        if self.advance {
            format!("{}\n{ADVANCE_TAG}", self.mark.label())
        } else {
            self.mark.label().to_string()
        }
    }
}

/// Applies the reservation policy to raw slot records.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    policy: ReservationPolicy,
    girl_view: bool,
    current_week: u32,
}

impl EligibilityEngine {
    /// Build an engine for the given configuration.
    #[must_use]
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            policy: config.policy.clone(),
            girl_view: config.is_girl_view(),
            current_week: config.navigation.current_week,
        }
    }

    /// First week (1-based) in which slots become advance-only.
    #[must_use]
    pub const fn advance_boundary_week(&self) -> u32 {
        self.policy.advance_days.saturating_sub(1) / 7 + 1
    }

    /// Whether a slot in the given day column is past the advance boundary.
    ///
    /// Within the boundary week the cut falls on column
    /// `(advance_days − 1) mod 7`; later weeks are advance-only throughout.
    #[must_use]
    pub fn is_advance_column(&self, column: usize) -> bool {
        if !self.policy.advance_reservation {
            return false;
        }
        let boundary = self.advance_boundary_week();
        let column = u32::try_from(column).unwrap_or(u32::MAX);
        self.current_week > boundary
            || (self.current_week == boundary
                && column >= self.policy.advance_days.saturating_sub(1) % 7)
    }

    /// Rewrite one slot for display.
    #[must_use]
    pub fn resolve(&self, slot: &SlotRecord, column: usize) -> EligibleSlot {
        let mut mark = slot.mark.clone();

        // Store-level calendar in the course-first free flow hides capacity
        // granularity: every availability grade reads as ○.
        if self.policy.free_reservation
            && self.policy.entry_mode == EntryMode::CourseFirst
            && !self.girl_view
            && matches!(mark, Mark::AvailableLow | Mark::AvailableHigh)
        {
            mark = Mark::AvailableMed;
        }

        // Only availability grades take the advance tag; 待 and label cells
        // never do.
        let advance = mark.is_available() && self.is_advance_column(column);

        let start_time = if self.girl_view {
            slot.start_time.clone().filter(|s| !s.is_empty())
        } else {
            None
        };

        EligibleSlot {
            mark,
            advance,
            start_time,
            system_date: slot.system_date,
        }
    }
}
