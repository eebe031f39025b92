//! Prompt templates for reminder messages.
//!
//! Every prompt asks for at most 15 words and a single emoji.

use crate::models::{Category, ClassifiedTask};

/// System instruction for non-overdue messages.
pub const FRIENDLY_SYSTEM: &str = "You write short, funny messages using very simple English. \
Use words that a 5-year-old can understand. No big words, no jargon, no technical terms. \
Talk like you're chatting with friends. Be funny but keep it simple and friendly.";

/// System instruction for overdue messages.
pub const OVERDUE_SYSTEM: &str = "You write messages using very simple English. \
Use words that a 5-year-old can understand. No big words, no jargon, no technical terms.";

const PRIVILEGED_SUFFIX: &str = " Always be respectful and funny when talking about the boss.";

/// System instruction for a task.
#[must_use]
pub fn system_for(category: Category, privileged: bool) -> String {
    match category {
        Category::Overdue { .. } if privileged => format!("{OVERDUE_SYSTEM}{PRIVILEGED_SUFFIX}"),
        Category::Overdue { .. } => OVERDUE_SYSTEM.to_string(),
        _ => FRIENDLY_SYSTEM.to_string(),
    }
}

/// User prompt for a task.
#[must_use]
pub fn prompt_for(task: &ClassifiedTask, mentions: &str, privileged: bool) -> String {
    let name = &task.name;
    match task.category {
        Category::Completed => format!(
            "Write a short funny message (max 15 words) praising {mentions} for finishing the task '{name}'. \
             Use very simple words like a 5-year-old would understand. Make it about the task. Add 1 emoji."
        ),
        Category::DueToday => format!(
            "Write a short funny reminder (max 15 words) telling {mentions} that their task '{name}' is due today. \
             Use very simple words like talking to a friend. Make it about the task. Add 1 emoji."
        ),
        Category::Unassigned => format!(
            "Write a short funny message (max 15 words) asking who wants to take the task '{name}'. \
             Use very simple words like talking to friends. Make it about the task. Add 1 emoji."
        ),
        Category::NoDueDate => format!(
            "Write a short funny message (max 15 words) about {mentions}'s task '{name}' having no due date. \
             Use very simple words everyone knows. Make it about the task. Add 1 emoji."
        ),
        Category::Overdue { days } if privileged => privileged_overdue(name, days),
        Category::Overdue { days } => overdue(name, mentions, days),
    }
}

fn privileged_overdue(name: &str, days: u32) -> String {
    match days {
        0 | 1 => format!(
            "Write a funny message (max 15 words) about the boss being {days} days late on '{name}'. \
             Be playful and respectful, like joking with your boss. Use simple words. Add 1 emoji."
        ),
        2 => format!(
            "Write a funny message (max 15 words) about the boss taking {days} days extra on '{name}'. \
             Be funny but respectful. Use simple words. Add 1 emoji."
        ),
        _ => format!(
            "Write a funny message (max 15 words) about the boss's '{name}' being {days} days overdue. \
             Make it funny and nice. Use simple words. Add 1 emoji."
        ),
    }
}

fn overdue(name: &str, mentions: &str, days: u32) -> String {
    let (kind, tone) = match days {
        0..=2 => ("funny message", "Keep it light and funny."),
        3..=5 => ("firmer reminder", "Be more serious but not mean."),
        6..=10 => ("serious message", "Be firm and direct."),
        _ => ("very serious message", "Be stern but professional."),
    };
    format!(
        "Write a {kind} (max 15 words) that {mentions}'s task '{name}' is {days} days late. \
         {tone} Use simple words. Add 1 emoji."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm::ListKind;

    fn task(name: &str, category: Category) -> ClassifiedTask {
        ClassifiedTask {
            id: "t1".to_string(),
            name: name.to_string(),
            assignees: vec!["alice".to_string()],
            category,
            list_name: "Sprint 4".to_string(),
            list_kind: ListKind::Sprint,
        }
    }

    #[test]
    fn test_every_prompt_limits_words_and_emoji() {
        let categories = [
            Category::Completed,
            Category::DueToday,
            Category::Unassigned,
            Category::NoDueDate,
            Category::Overdue { days: 1 },
            Category::Overdue { days: 4 },
            Category::Overdue { days: 8 },
            Category::Overdue { days: 30 },
        ];
        for category in categories {
            for privileged in [false, true] {
                let prompt = prompt_for(&task("Ship it", category), "@alice", privileged);
                assert!(prompt.contains("(max 15 words)"), "{prompt}");
                assert!(prompt.contains("Add 1 emoji."), "{prompt}");
                assert!(prompt.contains("'Ship it'"), "{prompt}");
            }
        }
    }

    #[test]
    fn test_overdue_tone_escalates_by_bucket() {
        let tone = |days| prompt_for(&task("X", Category::Overdue { days }), "@a", false);
        assert!(tone(2).contains("Keep it light and funny."));
        assert!(tone(3).contains("Be more serious but not mean."));
        assert!(tone(5).contains("firmer reminder"));
        assert!(tone(6).contains("Be firm and direct."));
        assert!(tone(10).contains("serious message"));
        assert!(tone(11).contains("Be stern but professional."));
    }

    #[test]
    fn test_privileged_overdue_stays_playful() {
        let prompt = prompt_for(&task("Budget", Category::Overdue { days: 40 }), "@ceo", true);
        assert!(prompt.contains("funny and nice"));
        assert!(!prompt.contains("stern"));
        assert!(system_for(Category::Overdue { days: 40 }, true).ends_with(PRIVILEGED_SUFFIX));
        assert_eq!(system_for(Category::Overdue { days: 40 }, false), OVERDUE_SYSTEM);
    }

    #[test]
    fn test_unassigned_prompt_has_no_mention() {
        let prompt = prompt_for(&task("Fix login bug", Category::Unassigned), "@channel", false);
        assert!(prompt.contains("asking who wants to take the task"));
        assert!(!prompt.contains("@channel"));
        assert_eq!(system_for(Category::Unassigned, false), FRIENDLY_SYSTEM);
    }
}
