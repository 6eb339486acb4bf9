//! Canned replies that bypass the model: streak summary, manager schedule and
//! task list. Formatters are pure; the `mock_*` builders supply the data.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Streak
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_workouts: u32,
    pub last_workout: NaiveDate,
    /// Oldest first, ending on `last_workout`.
    pub last_seven_days: [bool; 7],
}

/// Sample streak ending on `today`.
pub fn mock_streak(today: NaiveDate) -> StreakSummary {
    StreakSummary {
        current_streak: 5,
        longest_streak: 12,
        total_workouts: 48,
        last_workout: today,
        last_seven_days: [true, false, true, true, true, true, true],
    }
}

fn streak_encouragement(current: u32) -> &'static str {
    match current {
        0 => "Every streak starts with day one. Let's get moving today! 💪",
        1..=6 => "Nice momentum! Keep it up and you'll hit a full week soon! 🎉",
        _ => "You're on fire! That's some serious consistency! 🔥",
    }
}

pub fn format_streak_message(streak: &StreakSummary) -> String {
    let week: Vec<&str> = streak
        .last_seven_days
        .iter()
        .map(|done| if *done { "✅" } else { "⬜" })
        .collect();
    let days = |n: u32| if n == 1 { "day" } else { "days" };

    format!(
        "🔥 YOUR WORKOUT STREAK\n\n\
         • Current streak: {} {}\n\
         • Longest streak: {} {}\n\
         • Total workouts: {}\n\
         • Last workout: {}\n\n\
         Last 7 days: {}\n\n\
         {}",
        streak.current_streak,
        days(streak.current_streak),
        streak.longest_streak,
        days(streak.longest_streak),
        streak.total_workouts,
        streak.last_workout.format("%A, %B %-d"),
        week.join(" "),
        streak_encouragement(streak.current_streak),
    )
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Daily,
    Weekly,
    Project,
}

impl ScheduleKind {
    fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Daily => "daily",
            ScheduleKind::Weekly => "weekly",
            ScheduleKind::Project => "project",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Meeting,
    Focus,
    Break,
    Admin,
}

impl BlockKind {
    fn emoji(&self) -> &'static str {
        match self {
            BlockKind::Meeting => "👥",
            BlockKind::Focus => "🎯",
            BlockKind::Break => "☕",
            BlockKind::Admin => "📋",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub activity: String,
    pub kind: BlockKind,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub kind: ScheduleKind,
    pub date: NaiveDate,
    pub blocks: Vec<TimeBlock>,
    pub total_hours: f32,
    pub focus_hours: f32,
    pub meeting_hours: f32,
}

/// Rounded percentage; zero when `total` is zero.
fn percent(part: f32, total: f32) -> u32 {
    if total <= 0.0 {
        0
    } else {
        ((part / total) * 100.0).round() as u32
    }
}

fn clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn format_schedule_message(schedule: &Schedule) -> String {
    let mut out = format!(
        "📅 {} SCHEDULE for {}\n\n⏰ Schedule Overview:\n",
        schedule.kind.as_str().to_uppercase(),
        long_date(schedule.date)
    );

    for block in &schedule.blocks {
        out.push_str(&format!(
            "\n{} {} - {}\n   {}\n",
            block.kind.emoji(),
            clock(block.start),
            clock(block.end),
            block.activity
        ));
        if !block.participants.is_empty() {
            out.push_str(&format!("   • With: {}\n", block.participants.join(", ")));
        }
        if let Some(notes) = &block.notes {
            out.push_str(&format!("   • Note: {}\n", notes));
        }
    }

    out.push_str(&format!(
        "\n📊 Time Distribution:\n\
         • Total Hours: {}h\n\
         • Focus Time: {}h ({}%)\n\
         • Meeting Time: {}h ({}%)\n\n\
         💡 Tips:\n\
         • Take regular breaks\n\
         • Block time for deep work\n\
         • Buffer time between meetings\n\
         • Stay flexible for urgent matters\n\n\
         Need any adjustments to this schedule? Let me know! 📋",
        schedule.total_hours,
        schedule.focus_hours,
        percent(schedule.focus_hours, schedule.total_hours),
        schedule.meeting_hours,
        percent(schedule.meeting_hours, schedule.total_hours),
    ));
    out
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Sample workday for `date`.
pub fn mock_schedule(date: NaiveDate) -> Schedule {
    let block = |start: NaiveTime, end: NaiveTime, activity: &str, kind: BlockKind| TimeBlock {
        start,
        end,
        activity: activity.to_string(),
        kind,
        participants: Vec::new(),
        notes: None,
    };

    let mut standup = block(hm(9, 0), hm(9, 30), "Team standup", BlockKind::Meeting);
    standup.participants = vec!["Product team".to_string(), "Engineering".to_string()];
    let mut deep_work = block(hm(9, 30), hm(12, 0), "Deep work: quarterly roadmap", BlockKind::Focus);
    deep_work.notes = Some("Notifications off".to_string());
    let mut review = block(hm(14, 0), hm(15, 0), "Design review", BlockKind::Meeting);
    review.participants = vec!["Design".to_string()];

    Schedule {
        kind: ScheduleKind::Daily,
        date,
        blocks: vec![
            standup,
            deep_work,
            block(hm(12, 0), hm(13, 0), "Lunch break", BlockKind::Break),
            block(hm(13, 0), hm(14, 0), "Email and admin", BlockKind::Admin),
            review,
            block(hm(15, 0), hm(17, 0), "Focus block: project deliverables", BlockKind::Focus),
        ],
        total_hours: 8.0,
        focus_hours: 4.5,
        meeting_hours: 1.5,
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Blocked,
    Completed,
}

impl TaskStatus {
    fn emoji(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "📝",
            TaskStatus::InProgress => "⏳",
            TaskStatus::Blocked => "🚫",
            TaskStatus::Completed => "✅",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn completed(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    pub fn count_priority(&self, priority: Priority) -> usize {
        self.tasks.iter().filter(|t| t.priority == priority).count()
    }
}

pub fn format_task_list_message(list: &TaskList) -> String {
    let mut out = format!("📋 TASK LIST for {}\n", long_date(list.date));

    for task in &list.tasks {
        out.push_str(&format!(
            "\n{} {} {}\n   • {}\n",
            task.priority.emoji(),
            task.status.emoji(),
            task.title,
            task.description
        ));
        if let Some(due) = task.due {
            out.push_str(&format!("   • Due: {}\n", due.format("%b %-d")));
        }
        if let Some(assignee) = &task.assignee {
            out.push_str(&format!("   • Assignee: {}\n", assignee));
        }
        if let Some(notes) = &task.notes {
            out.push_str(&format!("   • Note: {}\n", notes));
        }
    }

    let total = list.tasks.len();
    let completed = list.completed();
    out.push_str(&format!(
        "\n📊 Progress Overview:\n\
         • Completed: {}/{} ({}%)\n\
         • Priority Breakdown:\n\
         \x20 - High: {}\n\
         \x20 - Medium: {}\n\
         \x20 - Low: {}\n\n\
         💡 Tips:\n\
         • Focus on high-priority items first\n\
         • Update task status regularly\n\
         • Delegate when possible\n\
         • Break down large tasks\n\n\
         Need to adjust any tasks or create new ones? Just let me know! 📋",
        completed,
        total,
        percent(completed as f32, total as f32),
        list.count_priority(Priority::High),
        list.count_priority(Priority::Medium),
        list.count_priority(Priority::Low),
    ));
    out
}

/// Sample task list for `date`.
pub fn mock_task_list(date: NaiveDate) -> TaskList {
    let in_days = |n: i64| date.checked_add_signed(Duration::days(n));
    let weekday_name = date.weekday().to_string();

    TaskList {
        date,
        tasks: vec![
            Task {
                title: "Finish quarterly report".to_string(),
                description: "Compile metrics and write the executive summary".to_string(),
                priority: Priority::High,
                status: TaskStatus::InProgress,
                due: in_days(1),
                assignee: Some("You".to_string()),
                notes: None,
            },
            Task {
                title: "Review pull requests".to_string(),
                description: "Two open reviews from the platform team".to_string(),
                priority: Priority::Medium,
                status: TaskStatus::Todo,
                due: Some(date),
                assignee: None,
                notes: Some(format!("Before {} standup", weekday_name)),
            },
            Task {
                title: "Vendor contract".to_string(),
                description: "Waiting on legal feedback".to_string(),
                priority: Priority::High,
                status: TaskStatus::Blocked,
                due: in_days(3),
                assignee: Some("Legal".to_string()),
                notes: None,
            },
            Task {
                title: "Update team wiki".to_string(),
                description: "Document the new onboarding steps".to_string(),
                priority: Priority::Low,
                status: TaskStatus::Completed,
                due: None,
                assignee: None,
                notes: None,
            },
        ],
    }
}
