//! Classified task types.

use std::fmt;

use pm::{ListDescriptor, ListKind};

/// Reminder bucket a task falls into. Exactly one per notified task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Completed within the trailing 24 hours.
    Completed,
    DueToday,
    /// Past due by `days` whole calendar days (always at least 1).
    Overdue { days: u32 },
    /// Nobody is assigned.
    Unassigned,
    /// Assigned, open, and without a due date.
    NoDueDate,
}

impl Category {
    /// Short label for logs and summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::DueToday => "due_today",
            Self::Overdue { .. } => "overdue",
            Self::Unassigned => "unassigned",
            Self::NoDueDate => "no_due_date",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdue { days } => write!(f, "overdue ({days} days)"),
            other => f.write_str(other.label()),
        }
    }
}

/// A task that will produce exactly one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTask {
    pub id: String,
    pub name: String,
    /// Assignee usernames; empty exactly when the category is `Unassigned`.
    pub assignees: Vec<String>,
    pub category: Category,
    pub list_name: String,
    pub list_kind: ListKind,
}

impl ClassifiedTask {
    pub fn new(task: &pm::RawTask, category: Category, list: &ListDescriptor) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            assignees: task.assignees.clone(),
            category,
            list_name: list.display_name(),
            list_kind: list.kind,
        }
    }
}
