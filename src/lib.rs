//! ascentia: ten-indicator stock scoring with a personal watchlist.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], wiring in [`context`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod context;
pub mod logging;
pub mod cli;
