use super::*;
use pledge_core::profile::{Settings, TaskEntry, TaskStatus, Tone, WeeklyStats};

#[test]
fn test_all_keys_resolve_in_every_tone() {
    let keys = [
        "welcome",
        "help_intro",
        "commit_empty",
        "commit_too_many",
        "commit_first",
        "morning_reminder",
        "evening_reminder",
        "unknown_command",
        "reset_notice",
        "fallback",
        "system_prompt",
        "ask_morning_time",
        "ask_evening_time",
        "ask_weekly_time",
        "ask_deadline_time",
        "ask_tone",
        "ask_timezone",
        "retry_time",
        "retry_weekly",
        "retry_tone",
        "retry_timezone",
        "usage_time",
        "usage_deadline",
        "usage_tz",
        "tz_unknown_warning",
        "settings_header",
        "settings_hint",
        "today_header",
        "no_tasks_today",
        "menu_morning",
        "menu_evening",
        "menu_weekly",
        "menu_deadline",
        "menu_tone",
        "menu_timezone",
        "label_morning",
        "label_evening",
        "label_weekly",
        "label_deadline",
        "label_timezone",
        "label_tone",
    ];
    for tone in Tone::ALL {
        for key in keys {
            assert_ne!(t(key, tone), "???", "missing {key} for {tone}");
        }
    }
}

#[test]
fn test_unknown_key() {
    assert_eq!(t("no_such_key", Tone::Mild), "???");
}

#[test]
fn test_tone_specific_lines_differ() {
    assert_ne!(t("fallback", Tone::Mild), t("fallback", Tone::Dos));
    assert_ne!(
        t("morning_reminder", Tone::Sharp),
        t("morning_reminder", Tone::Mild)
    );
}

#[test]
fn test_help_lists_commands() {
    let text = help(Tone::Sharp);
    assert!(text.starts_with(t("help_intro", Tone::Sharp)));
    for cmd in ["/tone", "/time", "/deadline", "/tz", "/settings", "/today"] {
        assert!(text.contains(cmd), "help is missing {cmd}");
    }
}

#[test]
fn test_weekly_report_percentages() {
    let text = weekly_report(Tone::Mild, 67, 0.5);
    assert!(text.contains("67%"));
    assert!(text.contains("50%"));
    let text = weekly_report(Tone::Dos, 0, 0.5);
    assert!(text.contains("0% completed"));
}

#[test]
fn test_task_line_shows_reason() {
    let mut task = TaskEntry::pending(2, "gym");
    task.status = TaskStatus::Miss;
    task.reason = Some("overslept".into());
    assert_eq!(task_line(&task), "B. gym [miss: overslept]");
    assert_eq!(task_line(&TaskEntry::pending(1, "read")), "A. read [pending]");
}

#[test]
fn test_commit_confirmed_enumerates() {
    let tasks = vec![TaskEntry::pending(1, "write"), TaskEntry::pending(2, "run")];
    let text = commit_confirmed(Tone::Mild, &tasks);
    assert!(text.contains("A. write"));
    assert!(text.contains("B. run"));
}

#[test]
fn test_report_summary_counts() {
    assert!(report_summary(Tone::Sharp, 2, 1, 3).starts_with("2/3 done, 1 missed."));
}

#[test]
fn test_tone_usage_lists_options() {
    let text = tone_usage(Tone::Mild);
    assert!(text.contains("mild, sharp, dos"));
    assert!(text.contains("Current tone: mild"));
}

#[test]
fn test_settings_summary_shows_values() {
    let text = settings_summary(&Settings::default());
    assert!(text.contains("07:30"));
    assert!(text.contains("Sun 19:00"));
    assert!(text.contains("Asia/Tokyo"));
}

#[test]
fn test_today_summary_empty() {
    let text = today_summary(Tone::Mild, &[], &WeeklyStats::default());
    assert!(text.contains(t("no_tasks_today", Tone::Mild)));
    assert!(text.contains("0 done, 0 missed, 0 total"));
}
