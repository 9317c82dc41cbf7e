use serde::{Deserialize, Serialize};

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

/// Body of `PUT /todos/{id}`. Clients send the whole task; `id` is tolerated
/// and ignored in favour of the path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<crate::domain::TaskId>,
    pub title: String,
    pub completed: bool,
}

pub const TODOS_ROUTE: &str = "/todos";

pub fn todo_route(id: crate::domain::TaskId) -> String {
    format!("{TODOS_ROUTE}/{id}")
}
