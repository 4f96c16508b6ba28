//! Tone templates: every user-facing string, in each reply style.
//!
//! Uses a simple `t(key, tone)` function for static strings and
//! `format_*`-style helpers in [`format`] for strings with interpolation.
//! Prompts and menu labels do not vary with tone.

mod format;
mod lines;
mod prompts;

#[cfg(test)]
mod tests;

pub use format::*;

use pledge_core::profile::Tone;

/// Return the static string for `key` in the given `tone`.
pub fn t(key: &str, tone: Tone) -> &'static str {
    if let Some(v) = lines::lookup(key, tone) {
        return v;
    }
    if let Some(v) = prompts::lookup(key) {
        return v;
    }
    "???"
}
