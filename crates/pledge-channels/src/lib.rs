//! # pledge-channels
//!
//! Messaging platform integrations for Pledge.

pub mod telegram;
pub(crate) mod utils;
