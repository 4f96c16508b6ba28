//! # pledge-providers
//!
//! Backends that answer free text the bot does not otherwise understand.

pub mod openai;
