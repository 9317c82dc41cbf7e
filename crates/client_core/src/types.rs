use std::fmt;

use shared::domain::{Task, TaskId};
use uuid::Uuid;

use crate::error::ActionError;

/// Placeholder identity for a task the server has not confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempTaskId(Uuid);

impl TempTaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TempTaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TempTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmp-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalId {
    Confirmed(TaskId),
    Pending(TempTaskId),
}

impl LocalId {
    pub fn confirmed(&self) -> Option<TaskId> {
        match self {
            Self::Confirmed(id) => Some(*id),
            Self::Pending(_) => None,
        }
    }
}

impl From<TaskId> for LocalId {
    fn from(value: TaskId) -> Self {
        Self::Confirmed(value)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed(id) => write!(f, "{id}"),
            Self::Pending(tmp) => write!(f, "{tmp}"),
        }
    }
}

/// A task as shown in the list, possibly still awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: LocalId,
    pub title: String,
    pub completed: bool,
}

impl TaskItem {
    pub fn is_pending(&self) -> bool {
        matches!(self.id, LocalId::Pending(_))
    }
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: LocalId::Confirmed(task.id),
            title: task.title,
            completed: task.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSlot {
    pub id: LocalId,
    pub draft: String,
}

/// Point-in-time copy of the controller state handed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListSnapshot {
    pub tasks: Vec<TaskItem>,
    pub editing: Option<EditSlot>,
    pub input: String,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<ActionError>,
}

impl TaskListSnapshot {
    pub fn task(&self, id: LocalId) -> Option<&TaskItem> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// How a mutating action resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing changed and no request was sent.
    Skipped,
    Committed,
    RolledBack(ActionError),
}
