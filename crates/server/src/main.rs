use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use server_api::{create_task, delete_task, list_tasks, update_task, ApiContext, TaskStore};
use shared::{
    domain::{Task, TaskId},
    error::{ApiError, ErrorCode},
    protocol::{CreateTaskRequest, UpdateTaskRequest, TODOS_ROUTE},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, Settings};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

const DEMO_TASKS: [(&str, bool); 2] = [("First Task", false), ("Completed Task", true)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let store = if settings.seed_demo_tasks {
        TaskStore::seeded(DEMO_TASKS)
    } else {
        TaskStore::new()
    };
    let state = AppState {
        api: ApiContext { store },
    };
    let app = build_router(Arc::new(state), &settings);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, seeded = settings.seed_demo_tasks, "todo server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, settings: &Settings) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(TODOS_ROUTE, get(http_list_tasks).post(http_create_task))
        .route(
            "/todos/:id",
            put(http_update_task).delete(http_delete_task),
        )
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .with_state(state)
}

fn error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(err))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(list_tasks(&state.api).await)
}

async fn http_create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    create_task(&state.api, req)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    update_task(&state.api, TaskId(id), req)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    delete_task(&state.api, TaskId(id))
        .await
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
