//! Optimistic task-list state and the actions that mutate it.
//!
//! Every action applies its change locally first, then confirms it with the
//! [`TaskApi`]. Commits and rollbacks look tasks up by [`LocalId`] when the
//! request resolves, so a request whose task has since disappeared changes
//! nothing. The state lock is never held across a remote call.

use std::sync::Arc;

use parking_lot::Mutex;
use shared::domain::{Task, TaskTitle, TitleError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    error::ActionError,
    types::{ActionOutcome, EditSlot, LocalId, TaskItem, TaskListSnapshot, TempTaskId},
    TaskApi,
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
struct TaskListState {
    tasks: Vec<TaskItem>,
    editing: Option<EditSlot>,
    input: String,
    loading: bool,
    in_flight: usize,
    error: Option<ActionError>,
}

impl TaskListState {
    fn snapshot(&self) -> TaskListSnapshot {
        TaskListSnapshot {
            tasks: self.tasks.clone(),
            editing: self.editing.clone(),
            input: self.input.clone(),
            loading: self.loading,
            submitting: self.in_flight > 0,
            error: self.error,
        }
    }

    fn position(&self, id: LocalId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn task_mut(&mut self, id: LocalId) -> Option<&mut TaskItem> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

pub struct TaskListController {
    api: Arc<dyn TaskApi>,
    state: Mutex<TaskListState>,
    events: broadcast::Sender<TaskListSnapshot>,
}

/// Lowers the in-flight count when an action finishes, however it finishes.
struct InFlightGuard<'a> {
    controller: &'a TaskListController,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.controller.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        self.controller.publish(&state);
    }
}

impl TaskListController {
    /// Starts empty and in the loading state; call [`Self::load`] next.
    pub fn new(api: Arc<dyn TaskApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            api,
            state: Mutex::new(TaskListState {
                tasks: Vec::new(),
                editing: None,
                input: String::new(),
                loading: true,
                in_flight: 0,
                error: None,
            }),
            events,
        })
    }

    pub fn snapshot(&self) -> TaskListSnapshot {
        self.state.lock().snapshot()
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskListSnapshot> {
        self.events.subscribe()
    }

    fn publish(&self, state: &TaskListState) {
        // No subscribers is fine; the snapshot is still readable on demand.
        let _ = self.events.send(state.snapshot());
    }

    fn begin_action(&self, state: &mut TaskListState) -> InFlightGuard<'_> {
        state.in_flight += 1;
        self.publish(state);
        InFlightGuard { controller: self }
    }

    fn reject_title(&self, err: TitleError) -> ActionOutcome {
        if err == TitleError::TooLong {
            let mut state = self.state.lock();
            state.error = Some(ActionError::TitleTooLong);
            self.publish(&state);
        }
        ActionOutcome::Skipped
    }

    pub async fn load(&self) -> Result<(), ActionError> {
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.error = None;
            self.publish(&state);
        }

        match self.api.list_tasks().await {
            Ok(tasks) => {
                let mut state = self.state.lock();
                state.tasks = tasks.into_iter().map(TaskItem::from).collect();
                state.loading = false;
                state.error = None;
                let editing_gone = state
                    .editing
                    .as_ref()
                    .is_some_and(|slot| state.tasks.iter().all(|task| task.id != slot.id));
                if editing_gone {
                    state.editing = None;
                }
                debug!(count = state.tasks.len(), "task list loaded");
                self.publish(&state);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "failed to load task list");
                let mut state = self.state.lock();
                state.tasks.clear();
                state.editing = None;
                state.loading = false;
                state.error = Some(ActionError::Load);
                self.publish(&state);
                Err(ActionError::Load)
            }
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let mut state = self.state.lock();
        state.input = text.into();
        self.publish(&state);
    }

    /// Adds a task from the current new-task input.
    pub async fn submit_input(&self) -> ActionOutcome {
        let input = self.state.lock().input.clone();
        self.add(&input).await
    }

    pub async fn add(&self, title: &str) -> ActionOutcome {
        let title = match TaskTitle::parse(title) {
            Ok(title) => title,
            Err(err) => return self.reject_title(err),
        };

        let temp_id = TempTaskId::new();
        let placeholder = LocalId::Pending(temp_id);
        let _guard = {
            let mut state = self.state.lock();
            state.error = None;
            state.tasks.insert(
                0,
                TaskItem {
                    id: placeholder,
                    title: title.as_str().to_string(),
                    completed: false,
                },
            );
            state.input.clear();
            self.begin_action(&mut state)
        };
        debug!(%temp_id, "optimistic add");

        match self.api.create_task(title.as_str()).await {
            Ok(task) => {
                let mut state = self.state.lock();
                let confirmed = LocalId::Confirmed(task.id);
                if let Some(index) = state.position(placeholder) {
                    if state.position(confirmed).is_some() {
                        state.tasks.remove(index);
                    } else {
                        state.tasks[index] = TaskItem::from(task);
                    }
                } else {
                    debug!(%temp_id, "placeholder gone before create resolved");
                }
                self.publish(&state);
                ActionOutcome::Committed
            }
            Err(error) => {
                warn!(%temp_id, %error, "add failed; removing placeholder");
                let mut state = self.state.lock();
                if let Some(index) = state.position(placeholder) {
                    state.tasks.remove(index);
                }
                state.error = Some(ActionError::Add);
                self.publish(&state);
                ActionOutcome::RolledBack(ActionError::Add)
            }
        }
    }

    /// Opens the edit slot on `id`, replacing any edit already in progress.
    /// Returns false when the task is unknown or not yet confirmed.
    pub fn begin_edit(&self, id: LocalId) -> bool {
        let mut state = self.state.lock();
        let draft = match state.tasks.iter().find(|task| task.id == id) {
            Some(task) if !task.is_pending() => task.title.clone(),
            _ => return false,
        };
        state.editing = Some(EditSlot { id, draft });
        self.publish(&state);
        true
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let mut state = self.state.lock();
        let Some(slot) = state.editing.as_mut() else {
            return;
        };
        slot.draft = text.into();
        self.publish(&state);
    }

    pub fn cancel_edit(&self) {
        let mut state = self.state.lock();
        if state.editing.take().is_some() {
            self.publish(&state);
        }
    }

    pub async fn save_edit(&self, id: LocalId) -> ActionOutcome {
        let Some(task_id) = id.confirmed() else {
            return ActionOutcome::Skipped;
        };
        let draft = {
            let state = self.state.lock();
            match state.editing.as_ref() {
                Some(slot) if slot.id == id => slot.draft.clone(),
                _ => return ActionOutcome::Skipped,
            }
        };
        let title = match TaskTitle::parse(&draft) {
            Ok(title) => title.into_string(),
            Err(err) => return self.reject_title(err),
        };

        let (payload, previous_title, _guard) = {
            let mut state = self.state.lock();
            let Some(task) = state.task_mut(id) else {
                return ActionOutcome::Skipped;
            };
            let previous_title = std::mem::replace(&mut task.title, title.clone());
            let payload = Task {
                id: task_id,
                title: title.clone(),
                completed: task.completed,
            };
            state.editing = None;
            state.error = None;
            (payload, previous_title, self.begin_action(&mut state))
        };
        debug!(task_id = task_id.0, "optimistic title edit");

        match self.api.update_task(&payload).await {
            Ok(()) => ActionOutcome::Committed,
            Err(error) => {
                warn!(task_id = task_id.0, %error, "edit failed; restoring title");
                let mut state = self.state.lock();
                if let Some(task) = state.task_mut(id).filter(|task| task.title == title) {
                    task.title = previous_title;
                }
                state.error = Some(ActionError::Save);
                self.publish(&state);
                ActionOutcome::RolledBack(ActionError::Save)
            }
        }
    }

    pub async fn toggle(&self, id: LocalId) -> ActionOutcome {
        let Some(task_id) = id.confirmed() else {
            return ActionOutcome::Skipped;
        };
        let (payload, _guard) = {
            let mut state = self.state.lock();
            let Some(task) = state.task_mut(id) else {
                return ActionOutcome::Skipped;
            };
            task.completed = !task.completed;
            let payload = Task {
                id: task_id,
                title: task.title.clone(),
                completed: task.completed,
            };
            state.error = None;
            (payload, self.begin_action(&mut state))
        };
        debug!(task_id = task_id.0, completed = payload.completed, "optimistic toggle");

        match self.api.update_task(&payload).await {
            Ok(()) => ActionOutcome::Committed,
            Err(error) => {
                warn!(task_id = task_id.0, %error, "toggle failed; restoring flag");
                let mut state = self.state.lock();
                if let Some(task) = state
                    .task_mut(id)
                    .filter(|task| task.completed == payload.completed)
                {
                    task.completed = !payload.completed;
                }
                state.error = Some(ActionError::Toggle);
                self.publish(&state);
                ActionOutcome::RolledBack(ActionError::Toggle)
            }
        }
    }

    pub async fn remove(&self, id: LocalId) -> ActionOutcome {
        let Some(task_id) = id.confirmed() else {
            return ActionOutcome::Skipped;
        };
        let (index, removed, _guard) = {
            let mut state = self.state.lock();
            let Some(index) = state.position(id) else {
                return ActionOutcome::Skipped;
            };
            let removed = state.tasks.remove(index);
            if state.editing.as_ref().is_some_and(|slot| slot.id == id) {
                state.editing = None;
            }
            state.error = None;
            (index, removed, self.begin_action(&mut state))
        };
        debug!(task_id = task_id.0, "optimistic remove");

        match self.api.delete_task(task_id).await {
            Ok(()) => ActionOutcome::Committed,
            Err(error) => {
                warn!(task_id = task_id.0, %error, "delete failed; restoring task");
                let mut state = self.state.lock();
                if state.position(id).is_none() {
                    let index = index.min(state.tasks.len());
                    state.tasks.insert(index, removed);
                }
                state.error = Some(ActionError::Delete);
                self.publish(&state);
                ActionOutcome::RolledBack(ActionError::Delete)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
