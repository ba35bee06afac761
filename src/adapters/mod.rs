//! Concrete adapter implementations for ports.

#[cfg(feature = "web")]
pub mod config_identity_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
#[cfg(feature = "web")]
pub mod web;
#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;
