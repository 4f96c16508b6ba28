//! Tone-specific static lines.

use pledge_core::profile::Tone;

pub(super) fn lookup(key: &str, tone: Tone) -> Option<&'static str> {
    use Tone::*;
    Some(match (key, tone) {
        ("welcome", Mild) => "Hi! I'm your accountability buddy. Every morning tell me up to three things you'll do, every evening tell me how it went.",
        ("welcome", Sharp) => "You're here to get things done. Three tasks in the morning, a report at night. No excuses.",
        ("welcome", Dos) => "Oh, another one who thinks they'll follow through. Prove it. Three tasks every morning, a report every night.",

        ("help_intro", Mild) => "Here's how we work together:",
        ("help_intro", Sharp) => "Commands. Learn them.",
        ("help_intro", Dos) => "Read this once. I won't repeat myself.",

        ("commit_empty", Mild) => "I didn't catch any tasks. Try something like: am: write report, gym, call mom",
        ("commit_empty", Sharp) => "No tasks? Write them: am: task one, task two, task three",
        ("commit_empty", Dos) => "Zero tasks. Impressive. Format: am: task one, task two, task three",

        ("commit_too_many", Mild) => "That's a lot for one day! Pick at most three so you can really finish them.",
        ("commit_too_many", Sharp) => "Three tasks max. Cut the list.",
        ("commit_too_many", Dos) => "More than three? You can't even finish one. Three max.",

        ("commit_first", Mild) => "There's nothing to report on yet. Start the day with: am: task one, task two",
        ("commit_first", Sharp) => "You never committed to anything today. Commit first: am: task one, task two",
        ("commit_first", Dos) => "Reporting on nothing? Commit first, genius: am: task one, task two",

        ("morning_reminder", Mild) => "Good morning! What are your three tasks for today? Reply with: am: task one, task two, task three",
        ("morning_reminder", Sharp) => "Morning. Three tasks. Now. am: task one, task two, task three",
        ("morning_reminder", Dos) => "Still in bed? Send your tasks before the day slips away again. am: task one, task two, task three",

        ("evening_reminder", Mild) => "How did today go? Reply with: pm: A=done, B=miss(reason), C=done",
        ("evening_reminder", Sharp) => "Report time. pm: A=done, B=miss(reason), C=done",
        ("evening_reminder", Dos) => "Time to confess. pm: A=done, B=miss(reason), C=done",

        ("unknown_command", Mild) => "I don't know that command. Send /help to see what I can do.",
        ("unknown_command", Sharp) => "Unknown command. /help.",
        ("unknown_command", Dos) => "That's not a command. /help, if you can manage it.",

        ("reset_notice", Mild) => "Let's start over. Send /settings whenever you're ready.",
        ("reset_notice", Sharp) => "Reset. Use /settings.",
        ("reset_notice", Dos) => "You lost me. Reset. /settings, try again.",

        ("fallback", Mild) => "I'm here for your tasks. Send am: ... in the morning and pm: ... in the evening, or /help.",
        ("fallback", Sharp) => "Stay on task. am: in the morning, pm: at night. /help if lost.",
        ("fallback", Dos) => "Chatting instead of working? am: in the morning, pm: at night.",

        ("system_prompt", Mild) => "You are a warm, encouraging accountability coach. Keep replies short and kind. Refer to the user's committed tasks and weekly stats when relevant, and nudge them toward finishing today's tasks.",
        ("system_prompt", Sharp) => "You are a strict, no-nonsense accountability coach. Keep replies short and direct. Refer to the user's committed tasks and weekly stats, and push them to finish today's tasks.",
        ("system_prompt", Dos) => "You are a merciless, sarcastic drill instructor acting as an accountability coach. Keep replies short and biting, never cruel about identity. Refer to the user's committed tasks and weekly stats and demand results.",

        _ => return None,
    })
}
