//! Weekly status feed: data model and payload parsing.

pub mod model;
pub mod parser;
