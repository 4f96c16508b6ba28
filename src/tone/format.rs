//! Format helpers for strings with interpolation.

use super::t;
use pledge_core::profile::{Settings, TaskEntry, TaskStatus, Tone, WeeklyStats};

/// Tone-specific help text with the command summary.
pub fn help(tone: Tone) -> String {
    format!(
        "{}\n\n\
         am: task one, task two, task three - commit today's tasks (max 3)\n\
         pm: A=done, B=miss(reason), C=done - report how it went\n\
         weekly review - see this week's results now\n\
         /today - today's tasks and this week's tally\n\
         /settings - change times, tone, timezone\n\
         /tone mild|sharp|dos - reply style\n\
         /time am|pm HH:MM - reminder times\n\
         /time weekly <day> HH:MM - weekly review slot\n\
         /deadline HH:MM - report deadline\n\
         /tz <zone> - timezone (e.g. Asia/Tokyo)",
        t("help_intro", tone)
    )
}

/// One task as `A. description [status]`.
pub fn task_line(task: &TaskEntry) -> String {
    let status = match (task.status, task.reason.as_deref()) {
        (TaskStatus::Pending, _) => "pending".to_string(),
        (TaskStatus::Done, _) => "done".to_string(),
        (TaskStatus::Miss, Some(reason)) => format!("miss: {reason}"),
        (TaskStatus::Miss, None) => "miss".to_string(),
    };
    format!("{}. {} [{status}]", task.label(), task.description)
}

/// Confirmation after a successful morning commit.
pub fn commit_confirmed(tone: Tone, tasks: &[TaskEntry]) -> String {
    let header = match tone {
        Tone::Mild => "Got it! Today you're going for:",
        Tone::Sharp => "Committed. Deliver:",
        Tone::Dos => "Written down. No backing out now:",
    };
    let list: Vec<String> = tasks
        .iter()
        .map(|task| format!("{}. {}", task.label(), task.description))
        .collect();
    format!("{header}\n{}", list.join("\n"))
}

/// Summary after an evening report.
pub fn report_summary(tone: Tone, done: usize, missed: usize, total: usize) -> String {
    let verdict = match tone {
        Tone::Mild if done == total => "Amazing, everything done! Rest well.",
        Tone::Mild if done == 0 => "Tough day. Tomorrow is a fresh start.",
        Tone::Mild => "Nice effort today.",
        Tone::Sharp if done == total => "All done. Keep it up.",
        Tone::Sharp if done == 0 => "Nothing done. Unacceptable. Fix it tomorrow.",
        Tone::Sharp => "Partial. Do better tomorrow.",
        Tone::Dos if done == total => "All of them? Don't get used to praise.",
        Tone::Dos if done == 0 => "Zero. Truly a talent.",
        Tone::Dos => "Half-hearted, as expected.",
    };
    format!("{done}/{total} done, {missed} missed. {verdict}")
}

/// The weekly review text. `alignment` is in `[0, 1]` and shown as a percentage.
pub fn weekly_report(tone: Tone, completion_rate: u32, alignment: f64) -> String {
    let alignment_pct = (alignment * 100.0).round() as u32;
    match tone {
        Tone::Mild => format!(
            "Weekly review: you completed {completion_rate}% of your tasks. \
             Goal alignment: {alignment_pct}%. A new week starts now, you've got this!"
        ),
        Tone::Sharp => format!(
            "Weekly review. Completion: {completion_rate}%. Alignment: {alignment_pct}%. \
             Stats reset. Raise the bar."
        ),
        Tone::Dos => format!(
            "Weekly verdict: {completion_rate}% completed, {alignment_pct}% aligned. \
             Slate wiped clean. Try not to embarrass yourself again."
        ),
    }
}

/// Notice sent after the deadline sweep closed the day.
pub fn deadline_notice(tone: Tone, swept: usize) -> String {
    match tone {
        Tone::Mild => format!(
            "The day's deadline passed, so I marked {swept} unreported task(s) as missed. \
             Let's report a little earlier tomorrow."
        ),
        Tone::Sharp => format!("Deadline passed. {swept} task(s) marked missed."),
        Tone::Dos => format!(
            "Deadline blown. {swept} task(s) marked missed. Silence is also an answer."
        ),
    }
}

/// Confirmation after a setting changed. `label_key` names the setting.
pub fn setting_updated(tone: Tone, label_key: &str, value: &str) -> String {
    let label = t(label_key, tone);
    match tone {
        Tone::Mild => format!("Done! {label} is now {value}."),
        Tone::Sharp => format!("{label}: {value}."),
        Tone::Dos => format!("{label} set to {value}. Now stick to it."),
    }
}

/// Confirmation after the tone changed, phrased in the new tone.
pub fn tone_set(tone: Tone) -> String {
    match tone {
        Tone::Mild => "Okay, I'll keep things gentle.".to_string(),
        Tone::Sharp => "Fine. No more sugar-coating.".to_string(),
        Tone::Dos => "You asked for it.".to_string(),
    }
}

/// Current tone plus the valid options.
pub fn tone_usage(current: Tone) -> String {
    let options: Vec<&str> = Tone::ALL.iter().map(Tone::as_str).collect();
    format!(
        "Current tone: {current}\nValid options: {}\nUsage: /tone <{}>",
        options.join(", "),
        options.join("|")
    )
}

/// Settings overview shown above the settings menu.
pub fn settings_summary(settings: &Settings) -> String {
    let tone = settings.tone;
    format!(
        "{}\n\
         {}: {}\n\
         {}: {}\n\
         {}: {} {}\n\
         {}: {}\n\
         {}: {}\n\
         {}: {}\n\n\
         {}",
        t("settings_header", tone),
        t("label_morning", tone),
        settings.morning_time,
        t("label_evening", tone),
        settings.evening_time,
        t("label_weekly", tone),
        settings.weekly_review_day,
        settings.weekly_review_time,
        t("label_deadline", tone),
        settings.deadline_time,
        t("label_timezone", tone),
        settings.timezone,
        t("label_tone", tone),
        settings.tone,
        t("settings_hint", tone),
    )
}

/// Today's tasks with their status, then this week's running counters.
pub fn today_summary(tone: Tone, tasks: &[TaskEntry], stats: &WeeklyStats) -> String {
    let body = if tasks.is_empty() {
        t("no_tasks_today", tone).to_string()
    } else {
        tasks.iter().map(task_line).collect::<Vec<_>>().join("\n")
    };
    format!(
        "{}\n{body}\n\nThis week: {} done, {} missed, {} total.",
        t("today_header", tone),
        stats.completed_tasks,
        stats.missed_tasks,
        stats.total_tasks
    )
}
