//! Small explicit parsers for task input.
//!
//! Grammars:
//! - marker:  `am:` | `morning:` (commit), `pm:` | `evening:` (report), case-insensitive
//! - commit:  item (sep item)*, sep = `,` | `、` | `，`
//! - report:  pair (sep pair)*, pair = slot `=` status [`(` reason `)`]
//!   slot = `A|B|C|1|2|3`, status = `done|miss`, both case-insensitive

use pledge_core::profile::TaskStatus;

const COMMIT_MARKERS: [&str; 2] = ["am:", "morning:"];
const REPORT_MARKERS: [&str; 2] = ["pm:", "evening:"];
const WEEKLY_TRIGGER: &str = "weekly review";

/// Which task-cycle handler a marker selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Commit,
    Report,
}

/// Detect a leading marker. Returns the marker and the text after it.
pub fn strip_marker(text: &str) -> Option<(Marker, &str)> {
    let text = text.trim_start();
    let candidates = COMMIT_MARKERS
        .iter()
        .map(|m| (Marker::Commit, *m))
        .chain(REPORT_MARKERS.iter().map(|m| (Marker::Report, *m)));
    for (marker, prefix) in candidates {
        if let Some(rest) = strip_prefix_ignore_case(text, prefix) {
            return Some((marker, rest));
        }
    }
    None
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Whether the text is the on-demand weekly review trigger.
pub fn is_weekly_trigger(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(WEEKLY_TRIGGER)
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | '、' | '，')
}

/// Split a commit body into trimmed, non-empty task descriptions.
pub fn parse_commit_items(body: &str) -> Vec<String> {
    body.split(is_separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// One parsed `<slot>=<status>(reason)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotResult {
    pub slot: u8,
    pub status: TaskStatus,
    /// Present only for `miss` with a non-empty reason.
    pub reason: Option<String>,
}

/// Parse a report body. Malformed pairs are skipped.
pub fn parse_report(body: &str) -> Vec<SlotResult> {
    split_top_level(body)
        .into_iter()
        .filter_map(parse_pair)
        .collect()
}

/// Split on separators that are not inside parentheses, so reasons may
/// contain commas.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' | '（' => depth += 1,
            ')' | '）' => depth = depth.saturating_sub(1),
            c if depth == 0 && is_separator(c) => {
                parts.push(&body[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn parse_slot(raw: &str) -> Option<u8> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "A" | "1" => Some(1),
        "B" | "2" => Some(2),
        "C" | "3" => Some(3),
        _ => None,
    }
}

fn parse_pair(pair: &str) -> Option<SlotResult> {
    let (slot, rest) = pair.split_once('=')?;
    let slot = parse_slot(slot)?;
    let rest = rest.trim();

    let (status, reason) = match rest.find(|c: char| matches!(c, '(' | '（')) {
        Some(open) => {
            let opener = rest[open..].chars().next()?;
            let inner = rest[open + opener.len_utf8()..]
                .strip_suffix(|c: char| matches!(c, ')' | '）'))?;
            (&rest[..open], Some(inner.trim()))
        }
        None => (rest, None),
    };

    let status = match status.trim().to_ascii_lowercase().as_str() {
        "done" => TaskStatus::Done,
        "miss" => TaskStatus::Miss,
        _ => return None,
    };
    let reason = match status {
        TaskStatus::Miss => reason.filter(|r| !r.is_empty()).map(str::to_string),
        _ => None,
    };

    Some(SlotResult {
        slot,
        status,
        reason,
    })
}
