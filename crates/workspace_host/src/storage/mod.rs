//! Lightweight persisted-preference contracts.

pub mod prefs;
