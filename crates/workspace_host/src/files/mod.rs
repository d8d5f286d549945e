//! Project-file contracts, models and in-memory adapters.

pub mod kind;
pub mod path;
pub mod service;
pub mod types;
