//! # pledge-memory
//!
//! Memory-resident profile and conversation-state store for Pledge.
//! Nothing here survives a restart.

pub mod store;

pub use store::{ProfileHandle, Store};
