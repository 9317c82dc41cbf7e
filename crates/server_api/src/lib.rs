use std::{collections::BTreeMap, sync::Arc};

use shared::{
    domain::{Task, TaskId, TaskTitle},
    error::ApiError,
    protocol::{CreateTaskRequest, UpdateTaskRequest},
};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory task collection shared by every request handler.
#[derive(Clone, Default)]
pub struct TaskStore {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: i64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding `titles` in order, numbered from 1.
    pub fn seeded<'a>(titles: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        let mut state = StoreState::default();
        for (title, completed) in titles {
            state.last_id += 1;
            let id = TaskId(state.last_id);
            state.tasks.insert(
                id,
                Task {
                    id,
                    title: title.to_string(),
                    completed,
                },
            );
        }
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }
}

#[derive(Clone, Default)]
pub struct ApiContext {
    pub store: TaskStore,
}

pub async fn list_tasks(ctx: &ApiContext) -> Vec<Task> {
    let state = ctx.store.inner.read().await;
    state.tasks.values().cloned().collect()
}

pub async fn create_task(ctx: &ApiContext, req: CreateTaskRequest) -> Result<Task, ApiError> {
    let title = TaskTitle::parse(&req.title)?;
    let mut state = ctx.store.inner.write().await;
    state.last_id += 1;
    let task = Task {
        id: TaskId(state.last_id),
        title: title.into_string(),
        completed: false,
    };
    state.tasks.insert(task.id, task.clone());
    debug!(task_id = task.id.0, "task created");
    Ok(task)
}

pub async fn update_task(
    ctx: &ApiContext,
    id: TaskId,
    req: UpdateTaskRequest,
) -> Result<Task, ApiError> {
    let title = TaskTitle::parse(&req.title)?;
    let mut state = ctx.store.inner.write().await;
    let task = state
        .tasks
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found(format!("task {id} not found")))?;
    task.title = title.into_string();
    task.completed = req.completed;
    debug!(task_id = id.0, completed = task.completed, "task updated");
    Ok(task.clone())
}

pub async fn delete_task(ctx: &ApiContext, id: TaskId) -> Result<(), ApiError> {
    let mut state = ctx.store.inner.write().await;
    state
        .tasks
        .remove(&id)
        .ok_or_else(|| ApiError::not_found(format!("task {id} not found")))?;
    debug!(task_id = id.0, "task deleted");
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
