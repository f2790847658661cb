#![forbid(unsafe_code)]

//! Reservation availability grid engine.
//!
//! Turns a weekly status feed into the bookable calendar table and drives
//! the slot-booking negotiation:
//! 1. **Feed parsing** — validates the 7-day payload shape
//! 2. **Eligibility rules** — free-reservation collapse, advance-only tagging
//! 3. **Rendering + merging** — cell grid with run-length span compression
//! 4. **Week navigation** — selector rows and bounded prev/next links
//! 5. **Negotiation** — propose → accept/decline → submit state machine
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use reservation_grid::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use reservation_grid::core::config::CalendarConfig;
//! use reservation_grid::grid::merge::{NoticeSettings, merge_grid};
//! ```

pub mod prelude;

pub mod booking;
pub mod core;
pub mod feed;
pub mod grid;
pub mod logger;
