//! Rule-based intent detection over the raw user message.
//!
//! Every classifier lowercases the message and looks for keyword substrings.
//! None of them allocate beyond the lowercase copy or keep state.

use crate::modes::Mode;

const WORKOUT_NOUNS: [&str; 8] = [
    "workout",
    "exercise",
    "training",
    "routine",
    "gym",
    "fitness",
    "lifting",
    "hiit",
];
const WORKOUT_VERBS: [&str; 12] = [
    "create", "make", "plan", "give", "build", "design", "suggest", "need", "want", "generate",
    "start", "help",
];

const STREAK_PHRASES: [&str; 7] = [
    "streak",
    "my progress",
    "how many days",
    "how consistent",
    "workout history",
    "days in a row",
    "check in",
];

const SCHEDULE_DIRECT: [&str; 4] = ["my schedule", "what do i have", "what's on", "whats on"];
const SCHEDULE_KEYWORDS: [&str; 10] = [
    "schedule",
    "calendar",
    "agenda",
    "plan",
    "timetable",
    "meetings",
    "today",
    "tomorrow",
    "week",
    "my day",
];
const SCHEDULE_ACTIONS: [&str; 15] = [
    "create", "make", "plan", "organize", "set up", "arrange", "show", "what", "tell", "check",
    "view", "see", "get", "whats", "what's",
];

const TASK_KEYWORDS: [&str; 7] = [
    "task",
    "todo",
    "to-do",
    "tasks",
    "list",
    "action items",
    "deliverable",
];
const TASK_ACTIONS: [&str; 6] = ["create", "manage", "track", "list", "show", "organize"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Asks for a workout: a workout noun together with an action verb.
pub fn is_workout_request(text: &str) -> bool {
    let text = text.to_lowercase();
    contains_any(&text, &WORKOUT_NOUNS) && contains_any(&text, &WORKOUT_VERBS)
}

/// Asks about the workout streak or consistency.
pub fn is_streak_request(text: &str) -> bool {
    contains_any(&text.to_lowercase(), &STREAK_PHRASES)
}

/// Asks to see or build a schedule. "my schedule" and similar phrases match
/// on their own; otherwise a schedule keyword and an action word are both needed.
pub fn is_schedule_request(text: &str) -> bool {
    let text = text.to_lowercase();
    if contains_any(&text, &SCHEDULE_DIRECT) {
        return true;
    }
    contains_any(&text, &SCHEDULE_KEYWORDS) && contains_any(&text, &SCHEDULE_ACTIONS)
}

/// Asks to see or manage tasks.
pub fn is_task_request(text: &str) -> bool {
    let text = text.to_lowercase();
    contains_any(&text, &TASK_KEYWORDS) && contains_any(&text, &TASK_ACTIONS)
}

/// A request answered with a canned reply instead of the model. Workout
/// requests are not listed here; the workout flow claims them first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Streak,
    Schedule,
    Task,
}

/// First matching canned intent for `message` in `mode`. Streak applies in
/// every mode; schedule and task only in manager mode.
pub fn classify(message: &str, mode: Mode) -> Option<Intent> {
    if is_streak_request(message) {
        return Some(Intent::Streak);
    }
    if mode == Mode::Manager {
        if is_schedule_request(message) {
            return Some(Intent::Schedule);
        }
        if is_task_request(message) {
            return Some(Intent::Task);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workout_needs_noun_and_verb() {
        assert!(is_workout_request("Can you create a workout for me?"));
        assert!(is_workout_request("I NEED a new gym routine"));
        assert!(!is_workout_request("My workout was great yesterday"));
        assert!(!is_workout_request("Please create a shopping list"));
    }

    #[test]
    fn streak_phrases() {
        assert!(is_streak_request("What's my streak?"));
        assert!(is_streak_request("how many days have I trained"));
        assert!(!is_streak_request("hello"));
    }

    #[test]
    fn schedule_direct_phrases_short_circuit() {
        assert!(is_schedule_request("my schedule please"));
        assert!(is_schedule_request("What do I have later"));
        assert!(is_schedule_request("whats on"));
    }

    #[test]
    fn schedule_needs_keyword_and_action_otherwise() {
        assert!(is_schedule_request("Can you show my calendar"));
        assert!(is_schedule_request("organize tomorrow"));
        assert!(!is_schedule_request("calendar"));
        assert!(!is_schedule_request("hello there"));
    }

    #[test]
    fn task_needs_keyword_and_action() {
        assert!(is_task_request("show my tasks"));
        assert!(is_task_request("Create a to-do for the launch"));
        assert!(!is_task_request("tasks"));
        assert!(!is_task_request("show me something"));
    }

    #[test]
    fn classify_respects_mode_scope() {
        assert_eq!(classify("create a workout", Mode::Bff), None);
        assert_eq!(classify("what's my streak", Mode::Girlfriend), Some(Intent::Streak));
        assert_eq!(classify("show my schedule", Mode::Manager), Some(Intent::Schedule));
        assert_eq!(classify("show my schedule", Mode::Bff), None);
        assert_eq!(classify("show my tasks", Mode::Manager), Some(Intent::Task));
        assert_eq!(classify("tell me a joke", Mode::Manager), None);
    }
}
