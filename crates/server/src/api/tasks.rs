//! Task endpoints: submit probes, look up a record, count by status.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use taskscheduler_scheduler::{TaskId, TaskRecord, TaskStats, TaskStatus};
use taskscheduler_tasks::{HttpStatusTask, PingTask};

use crate::state::AppState;

use super::{api_error, ApiError};

#[derive(Debug, Deserialize)]
pub struct CreatePingTaskRequest {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateHttpTaskRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct TaskCreatedResponse {
    pub task_id: TaskId,
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(req)| req).map_err(|rejection| {
        warn!(%rejection, "rejected task request body");
        api_error(StatusCode::BAD_REQUEST, "invalid request body")
    })
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("{field} is required"),
        ));
    }
    Ok(())
}

/// POST /tasks/ping
pub async fn create_ping_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreatePingTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskCreatedResponse>), ApiError> {
    let req = parse_body(body)?;
    require("address", &req.address)?;
    let task_id = state
        .scheduler
        .submit(PingTask::new(req.address.trim(), &state.probes));
    info!(%task_id, address = %req.address, "ping task created");
    Ok((StatusCode::CREATED, Json(TaskCreatedResponse { task_id })))
}

/// POST /tasks/http
pub async fn create_http_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateHttpTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskCreatedResponse>), ApiError> {
    let req = parse_body(body)?;
    require("url", &req.url)?;
    let task = HttpStatusTask::new(req.url.trim(), state.http_client.clone(), &state.probes);
    let task_id = state.scheduler.submit(task);
    info!(%task_id, url = %req.url, "http task created");
    Ok((StatusCode::CREATED, Json(TaskCreatedResponse { task_id })))
}

/// GET /tasks/{id}
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskRecord>, ApiError> {
    let record = id
        .parse::<TaskId>()
        .ok()
        .and_then(|id| state.scheduler.get(&id))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "task not found"))?;

    if record.status == TaskStatus::Failed {
        warn!(
            task_id = %record.id,
            error = record.failure.as_deref().unwrap_or_default(),
            "reporting failed task"
        );
    }
    Ok(Json(record))
}

/// GET /tasks/stats
pub async fn task_stats(State(state): State<Arc<AppState>>) -> Json<TaskStats> {
    Json(state.scheduler.stats())
}
