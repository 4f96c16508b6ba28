//! Prompts, retry hints, and menu labels shared by every tone.

pub(super) fn lookup(key: &str) -> Option<&'static str> {
    Some(match key {
        "ask_morning_time" => "What time should I remind you each morning? (HH:MM, 24-hour)",
        "ask_evening_time" => "What time should I ask for your evening report? (HH:MM, 24-hour)",
        "ask_weekly_time" => "When should the weekly review run? (HH:MM, or <day> HH:MM such as Sun 19:00)",
        "ask_deadline_time" => "When is your daily report deadline? (HH:MM, 24-hour)",
        "ask_tone" => "Pick a tone: mild, sharp, or dos.",
        "ask_timezone" => "Which timezone are you in? (IANA name, e.g. Asia/Tokyo)",

        "retry_time" => "Please send a 24-hour time as HH:MM, e.g. 07:30.",
        "retry_weekly" => "Please send HH:MM or <day> HH:MM, e.g. Sun 19:00.",
        "retry_tone" => "Please choose one of: mild, sharp, dos.",
        "retry_timezone" => "Please send a timezone name, e.g. Asia/Tokyo.",

        "usage_time" => "Usage: /time am HH:MM | /time pm HH:MM | /time weekly <day> HH:MM",
        "usage_deadline" => "Usage: /deadline HH:MM",
        "usage_tz" => "Usage: /tz <zone>, e.g. /tz Asia/Tokyo",
        "tz_unknown_warning" => "I don't recognize that zone, so reminders are paused until it's fixed.",

        "settings_header" => "Your settings:",
        "settings_hint" => "Tap an option to change it.",
        "today_header" => "Today:",
        "no_tasks_today" => "No tasks committed yet.",

        "menu_morning" => "Morning time",
        "menu_evening" => "Evening time",
        "menu_weekly" => "Weekly review",
        "menu_deadline" => "Deadline",
        "menu_tone" => "Tone",
        "menu_timezone" => "Timezone",

        "label_morning" => "Morning reminder",
        "label_evening" => "Evening reminder",
        "label_weekly" => "Weekly review",
        "label_deadline" => "Report deadline",
        "label_timezone" => "Timezone",
        "label_tone" => "Tone",

        _ => return None,
    })
}
