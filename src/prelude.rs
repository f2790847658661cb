//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use reservation_grid::prelude::*;
//! ```

// Core
pub use crate::core::config::CalendarConfig;
pub use crate::core::errors::{GridError, Result};

// Feed
pub use crate::feed::model::{DAYS_PER_WEEK, DayBucket, Mark, SlotRecord, StatusFeed};
pub use crate::feed::parser::{parse_feed, parse_feed_value};

// Grid
pub use crate::grid::eligibility::{EligibilityEngine, EligibleSlot};
pub use crate::grid::merge::{NoticeSettings, merge_grid};
pub use crate::grid::navigator::{NavLink, WeekNavigator, WeekOption, WeekWindow};
pub use crate::grid::render::{CellContent, CellGrid, GridRenderer, RenderedCell, RenderedGrid};
pub use crate::grid::{ChartView, PageView, build_page};

// Booking
pub use crate::booking::negotiator::{
    BookingOutcome, Decision, Effect, ModalContent, Negotiator, Phase, SlotClick, run_booking,
};
pub use crate::booking::protocol::{
    BookingBackend, ProposalData, ProposalRequest, ProposalResponse, SubmissionRequest,
};
