//! Task classification.
//!
//! Decision order, first match wins:
//!
//! 1. no assignees: [`Category::Unassigned`]
//! 2. no due date and not complete: [`Category::NoDueDate`]
//! 3. complete: [`Category::Completed`] if closed within the last 24 hours,
//!    otherwise skipped
//! 4. due date today: [`Category::DueToday`]; in the past:
//!    [`Category::Overdue`]; in the future or unparseable: skipped
//!
//! Calendar dates are taken in the time zone of the reference time.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pm::{ListDescriptor, RawTask};
use tracing::{debug, info, warn};

use crate::models::{Category, ClassifiedTask};

/// Status string ClickUp uses for finished tasks.
pub const COMPLETED_STATUS: &str = "complete";

/// Completed tasks older than this are not reported.
pub const COMPLETION_WINDOW_HOURS: i64 = 24;

/// Why a task produced no notification. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// Completed more than 24 hours ago.
    StaleCompletion,
    /// Complete but no completion timestamp.
    MissingCompletion,
    /// Completion timestamp is not epoch milliseconds.
    InvalidCompletion,
    /// Due date is after today.
    FutureDue,
    /// Due date is not epoch milliseconds.
    InvalidDue,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StaleCompletion => "completed_over_24h_ago",
            Self::MissingCompletion => "no_completion_date",
            Self::InvalidCompletion => "invalid_completion_date",
            Self::FutureDue => "due_in_future",
            Self::InvalidDue => "invalid_due_date",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a task, or `None` if it should not be notified.
pub fn classify<Tz: TimeZone>(task: &RawTask, now: &DateTime<Tz>) -> Option<Category> {
    evaluate(task, now).ok()
}

/// Classify a task, reporting why it was skipped.
pub fn evaluate<Tz: TimeZone>(task: &RawTask, now: &DateTime<Tz>) -> Result<Category, SkipReason> {
    if task.assignees.is_empty() {
        return Ok(Category::Unassigned);
    }

    let is_complete = task.status == COMPLETED_STATUS;

    match (task.due_at.as_deref(), is_complete) {
        (None, false) => Ok(Category::NoDueDate),
        (_, true) => completion_category(task, now),
        (Some(due), false) => due_category(task, due, now),
    }
}

fn completion_category<Tz: TimeZone>(
    task: &RawTask,
    now: &DateTime<Tz>,
) -> Result<Category, SkipReason> {
    let Some(raw) = task.completed_at.as_deref() else {
        debug!(task = %task.name, "Task has no completion date");
        return Err(SkipReason::MissingCompletion);
    };

    let Some(completed) = parse_millis(raw).and_then(DateTime::<Utc>::from_timestamp_millis)
    else {
        warn!(task = %task.name, value = raw, "Invalid completion date");
        return Err(SkipReason::InvalidCompletion);
    };

    let elapsed = now.with_timezone(&Utc) - completed;
    if elapsed <= Duration::hours(COMPLETION_WINDOW_HOURS) {
        debug!(task = %task.name, completed = %completed, "Task completed recently");
        Ok(Category::Completed)
    } else {
        debug!(task = %task.name, completed = %completed, "Task completed too long ago");
        Err(SkipReason::StaleCompletion)
    }
}

fn due_category<Tz: TimeZone>(
    task: &RawTask,
    raw: &str,
    now: &DateTime<Tz>,
) -> Result<Category, SkipReason> {
    let Some(due) = parse_millis(raw).and_then(|ms| now.timezone().timestamp_millis_opt(ms).single())
    else {
        warn!(task = %task.name, value = raw, "Invalid due date format");
        return Err(SkipReason::InvalidDue);
    };

    let today = now.date_naive();
    let due_date = due.date_naive();

    if due_date == today {
        Ok(Category::DueToday)
    } else if due_date < today {
        let days = (today - due_date).num_days();
        debug!(task = %task.name, days, "Task is overdue");
        Ok(Category::Overdue {
            days: u32::try_from(days).unwrap_or(u32::MAX),
        })
    } else {
        Err(SkipReason::FutureDue)
    }
}

fn parse_millis(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Classification result for one source list.
#[derive(Debug, Default)]
pub struct ListClassification {
    pub tasks: Vec<ClassifiedTask>,
    pub skipped: BTreeMap<SkipReason, usize>,
}

/// Classify every task of a list, preserving source order.
pub fn classify_list<Tz: TimeZone>(
    tasks: &[RawTask],
    list: &ListDescriptor,
    now: &DateTime<Tz>,
) -> ListClassification {
    let mut result = ListClassification::default();
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();

    for task in tasks {
        match evaluate(task, now) {
            Ok(category) => {
                *counts.entry(category.label()).or_default() += 1;
                result.tasks.push(ClassifiedTask::new(task, category, list));
            }
            Err(reason) => {
                *result.skipped.entry(reason).or_default() += 1;
            }
        }
    }

    let count = |label: &str| counts.get(label).copied().unwrap_or(0);
    info!(
        list = %list.display_name(),
        kind = %list.kind,
        completed = count("completed"),
        due_today = count("due_today"),
        overdue = count("overdue"),
        unassigned = count("unassigned"),
        no_due_date = count("no_due_date"),
        skipped = result.skipped.values().sum::<usize>(),
        "List summary"
    );

    result
}
