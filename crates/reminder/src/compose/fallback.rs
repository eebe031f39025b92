//! Canned messages used when generation is unavailable.

use crate::models::Category;

/// Kind of work a task name suggests. Drives fallback wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Bug,
    Test,
    Design,
    Api,
    Database,
    Deploy,
    Docs,
    Meeting,
    General,
}

/// Keyword sets, checked in order. First hit wins.
const KEYWORDS: &[(TaskType, &[&str])] = &[
    (TaskType::Bug, &["bug", "fix", "error", "issue", "broken"]),
    (TaskType::Test, &["test", "testing", "qa", "quality"]),
    (TaskType::Design, &["design", "ui", "ux", "interface", "mockup"]),
    (TaskType::Api, &["api", "endpoint", "service", "backend"]),
    (TaskType::Database, &["database", "db", "query", "sql"]),
    (TaskType::Deploy, &["deploy", "release", "production", "launch"]),
    (TaskType::Docs, &["document", "docs", "readme", "guide"]),
    (TaskType::Meeting, &["meeting", "call", "discuss", "review"]),
];

impl TaskType {
    /// Infer the task type from a task name (case-insensitive substring match).
    #[must_use]
    pub fn infer(task_name: &str) -> Self {
        let lower = task_name.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map_or(Self::General, |(kind, _)| *kind)
    }
}

/// Fallback text for a task. `m` is the resolved mention string.
#[must_use]
pub fn humor(category: Category, task_name: &str, m: &str, privileged: bool) -> String {
    let kind = TaskType::infer(task_name);
    match category {
        Category::Completed => completed(kind, m),
        Category::DueToday => due_today(kind, m),
        Category::Unassigned => unassigned(kind).to_string(),
        Category::NoDueDate => no_due_date(kind, m),
        Category::Overdue { days } if privileged => privileged_overdue(m, days),
        Category::Overdue { days } => overdue(m, days),
    }
}

fn completed(kind: TaskType, m: &str) -> String {
    match kind {
        TaskType::Bug => format!("🐛 {m} fixed that bug! Nice work!"),
        TaskType::Test => format!("✅ {m} tested it! All good!"),
        TaskType::Design => format!("🎨 {m} made it look great!"),
        TaskType::Api => format!("🔌 {m} connected it! Works now!"),
        TaskType::Database => format!("💾 {m} organized the data! Clean!"),
        TaskType::Deploy => format!("🚀 {m} put it live! Success!"),
        TaskType::Docs => format!("📚 {m} wrote it down! Clear!"),
        TaskType::Meeting => format!("🤝 {m} had the meeting! Done!"),
        TaskType::General => format!("🎉 Great job {m}! Task done!"),
    }
}

fn due_today(kind: TaskType, m: &str) -> String {
    match kind {
        TaskType::Bug => format!("🐛 Hey {m}, fix that bug today!"),
        TaskType::Test => format!("🧪 Hey {m}, test it today!"),
        TaskType::Design => format!("🎨 Hey {m}, make it pretty today!"),
        TaskType::Api => format!("🔌 Hey {m}, connect it today!"),
        TaskType::Database => format!("💾 Hey {m}, organize data today!"),
        TaskType::Deploy => format!("🚀 Hey {m}, put it live today!"),
        TaskType::Docs => format!("📚 Hey {m}, write it today!"),
        TaskType::Meeting => format!("🤝 Hey {m}, meeting today!"),
        TaskType::General => format!("⏰ Hey {m}, task due today!"),
    }
}

const fn unassigned(kind: TaskType) -> &'static str {
    match kind {
        TaskType::Bug => "🐛 Who wants to fix this bug?",
        TaskType::Test => "🧪 Who wants to test this?",
        TaskType::Design => "🎨 Who wants to design this?",
        TaskType::Api => "🔌 Who wants to connect this?",
        TaskType::Database => "💾 Who wants to organize data?",
        TaskType::Deploy => "🚀 Who wants to put this live?",
        TaskType::Docs => "📚 Who wants to write this?",
        TaskType::Meeting => "🤝 Who wants to join this meeting?",
        TaskType::General => "🤷 Who wants this task?",
    }
}

fn no_due_date(kind: TaskType, m: &str) -> String {
    match kind {
        TaskType::Bug => format!("🐛 {m}, when will you fix this bug?"),
        TaskType::Test => format!("🧪 {m}, when will you test this?"),
        TaskType::Design => format!("🎨 {m}, when will you design this?"),
        TaskType::Api => format!("🔌 {m}, when will you connect this?"),
        TaskType::Database => format!("💾 {m}, when will you organize this?"),
        TaskType::Deploy => format!("🚀 {m}, when will you put this live?"),
        TaskType::Docs => format!("📚 {m}, when will you write this?"),
        TaskType::Meeting => format!("🤝 {m}, when is this meeting?"),
        TaskType::General => format!("📅 {m}, when is this due?"),
    }
}

fn privileged_overdue(m: &str, d: u32) -> String {
    match d {
        0 | 1 => format!("😄 {m}, even the best boss needs a little nudge sometimes! {d} days and counting!"),
        2 => format!("🎩 {m}, your task is taking a little vacation! {d} days of fun!"),
        3 => format!("👑 {m}, even kings take their time! {d} days of royal delay!"),
        4 => format!("🌟 {m}, your task is aging like fine wine! {d} days of perfection!"),
        _ => format!("🚀 {m}, slow and steady wins the race! {d} days of careful thinking!"),
    }
}

fn overdue(m: &str, d: u32) -> String {
    match d {
        0 | 1 => format!("😄 {m}, your task is taking a little nap! {d} days of rest!"),
        2 => format!("🐌 {m}, your task is moving like a snail! {d} days slow!"),
        3..=5 => format!("🔔 {m}, {d} days late now. Time to catch up!"),
        6..=10 => format!("🚨 {m}, this is {d} days late. Please finish it soon!"),
        _ => format!("⚠️ {m}, {d} days late is too much. We need this done now!"),
    }
}
