//! Core domain types and the scoring engine.

pub mod error;
pub mod fundamentals;
pub mod indicator;
pub mod price_series;
pub mod report;
pub mod scoring;
pub mod ticker;
pub mod watchlist;
