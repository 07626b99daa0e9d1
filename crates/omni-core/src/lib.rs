//! Core domain + application logic for the Omni assistant bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Seedance
//! render API live behind ports (traits) implemented in adapter crates.

pub mod audit;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod features;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod render;
pub mod scheduler;

pub use errors::{Error, Result};
