//! # pledge-core
//!
//! Core types, traits, configuration, and error handling for the Pledge bot.

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod profile;
pub mod traits;
