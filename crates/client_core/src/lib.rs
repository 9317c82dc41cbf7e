use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Task, TaskId},
    protocol::{todo_route, CreateTaskRequest, UpdateTaskRequest, TODOS_ROUTE},
};
use tracing::debug;

pub mod config;
mod controller;
pub mod error;
pub mod types;
pub mod view;

pub use config::ClientConfig;
pub use controller::TaskListController;
pub use error::ActionError;
pub use types::{ActionOutcome, EditSlot, LocalId, TaskItem, TaskListSnapshot, TempTaskId};

/// Remote CRUD service the controller confirms its optimistic changes with.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn create_task(&self, title: &str) -> Result<Task>;
    async fn update_task(&self, task: &Task) -> Result<()>;
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}

/// [`TaskApi`] over the REST endpoints under `/todos`.
pub struct HttpTaskApi {
    http: Client,
    config: ClientConfig,
}

impl HttpTaskApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let url = self.config.endpoint(TODOS_ROUTE);
        debug!(%url, "fetching tasks");
        let tasks = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(tasks)
    }

    async fn create_task(&self, title: &str) -> Result<Task> {
        let url = self.config.endpoint(TODOS_ROUTE);
        debug!(%url, "creating task");
        let task = self
            .http
            .post(url)
            .json(&CreateTaskRequest {
                title: title.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let url = self.config.endpoint(&todo_route(task.id));
        debug!(%url, completed = task.completed, "updating task");
        self.http
            .put(url)
            .json(&UpdateTaskRequest {
                id: Some(task.id),
                title: task.title.clone(),
                completed: task.completed,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let url = self.config.endpoint(&todo_route(id));
        debug!(%url, "deleting task");
        self.http.delete(url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
