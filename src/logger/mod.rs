//! Structured event logging.

pub mod jsonl;
