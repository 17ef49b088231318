//! Map raw oracle output onto the task vocabulary

use crate::entity::tasks::TaskKind;

/// Find the first task label mentioned in `response`
///
/// Matching is case-insensitive and treats spaces and hyphens as
/// underscores, so "Move to food" and "move-to-food" both resolve.
/// Labels are tried in vocabulary order.
pub fn match_task(response: &str) -> Option<TaskKind> {
    let normalized: String = response
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();

    TaskKind::ALL
        .into_iter()
        .find(|task| normalized.contains(task.label()))
}

/// Like [`match_task`], but anything unrecognised becomes Explore
pub fn parse_task(response: &str) -> TaskKind {
    match_task(response).unwrap_or(TaskKind::Explore)
}
