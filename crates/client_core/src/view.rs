//! Plain-text rendering of a [`TaskListSnapshot`].

use crate::types::{TaskItem, TaskListSnapshot};

pub const LOADING_MESSAGE: &str = "Loading todos...";
pub const EMPTY_MESSAGE: &str = "No todos yet. Add one above!";

/// Renders the list view, one display line per entry. Tasks are numbered
/// from 1 in display order so a shell can address them by position.
pub fn render_lines(snapshot: &TaskListSnapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(snapshot.tasks.len() + 2);

    if let Some(error) = snapshot.error {
        lines.push(format!("! {error}"));
    }

    if snapshot.loading {
        lines.push(LOADING_MESSAGE.to_string());
        return lines;
    }

    if snapshot.tasks.is_empty() {
        lines.push(EMPTY_MESSAGE.to_string());
        return lines;
    }

    for (index, task) in snapshot.tasks.iter().enumerate() {
        lines.push(render_task(snapshot, index + 1, task));
    }

    if snapshot.submitting {
        lines.push("(saving changes, actions disabled)".to_string());
    }

    lines
}

fn render_task(snapshot: &TaskListSnapshot, position: usize, task: &TaskItem) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let editing = snapshot
        .editing
        .as_ref()
        .filter(|slot| slot.id == task.id);

    match editing {
        Some(slot) => format!("{position:>3}. {check} {} (editing)", slot.draft),
        None if task.is_pending() => format!("{position:>3}. {check} {} (saving)", task.title),
        None => format!("{position:>3}. {check} {}", task.title),
    }
}
