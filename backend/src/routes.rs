//! HTTP surface: routing plus the task handlers.
//!
//! | Method | Path                | Handler       |
//! |--------|---------------------|---------------|
//! | GET    | `/tasks`            | [`list_tasks`]  |
//! | POST   | `/tasks`            | [`create_task`] |
//! | GET    | `/tasks/{id}`       | [`get_task`]    |
//! | PUT    | `/tasks/{id}`       | [`update_task`] |
//!
//! Every route sits behind [`require_bearer`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::{middleware, Router};
use tasks_shared::Task;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::{require_bearer, AuthToken};
use crate::error::ApiError;
use crate::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    pub token: AuthToken,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>, token: AuthToken) -> Self {
        Self { store, token }
    }
}

pub fn router(state: AppState) -> Router {
    let token = state.token.clone();
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task)
                .put(update_task)
                .fallback(unsupported_task_method),
        )
        .fallback(unmatched)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(token, require_bearer)),
        )
}

/// Only the first `completed` pair counts; an empty value means no filter.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let completed = params
        .iter()
        .find(|(key, _)| key == "completed")
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty());
    let tasks = match completed {
        Some(raw) => {
            let completed = parse_completed(raw)?;
            state.store.tasks_by_completion(completed).await?
        }
        None => state.store.all_tasks().await?,
    };
    Ok(Json(tasks))
}

/// Inserts a blank task; any request body is ignored. Responds with the new id as text.
pub async fn create_task(State(state): State<AppState>) -> Result<String, ApiError> {
    let id = state.store.add_task(Task::blank()).await?;
    Ok(id.to_string())
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let task = state.store.task_by_id(id).await?;
    Ok(Json(task))
}

/// Full replace of `name` and `completed`. The id always comes from the path.
pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let id = parse_task_id(&raw_id)?;
    let mut task = decode_task(&body)?;
    task.id = id;
    state.store.edit_task(task).await?;
    Ok(StatusCode::OK)
}

/// A well-formed id with a method other than GET or PUT; a bad id still wins with 400.
async fn unsupported_task_method(Path(raw_id): Path<String>) -> Result<Response, ApiError> {
    let _ = parse_task_id(&raw_id)?;
    Ok((
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET,HEAD,PUT")],
    )
        .into_response())
}

/// Anything under `/tasks/` that is not a single numeric id is a bad request.
async fn unmatched(uri: Uri) -> Response {
    if uri.path().starts_with("/tasks/") {
        return ApiError::BadRequest(format!("invalid task path {}", uri.path())).into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

fn parse_task_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest(format!("invalid task id {raw:?}")));
    }
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid task id {raw:?}: {e}")))
}

/// Decodes the first JSON value in `body` and ignores whatever follows it.
/// A `null` body decodes to a blank task.
fn decode_task(body: &[u8]) -> Result<Task, ApiError> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Task>>()
        .next()
        .ok_or_else(|| ApiError::BadRequest("request body is empty".to_string()))?;
    let task = first.map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(task.unwrap_or_default())
}

fn parse_completed(raw: &str) -> Result<bool, ApiError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(ApiError::BadRequest(format!(
            "invalid boolean {other:?} for completed"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_ids_are_plain_digits() {
        assert_eq!(parse_task_id("0").unwrap(), 0);
        assert_eq!(parse_task_id("0042").unwrap(), 42);
        assert!(parse_task_id("").is_err());
        assert!(parse_task_id("bad").is_err());
        assert!(parse_task_id("-1").is_err());
        assert!(parse_task_id("+1").is_err());
        assert!(parse_task_id("99999999999999999999").is_err());
    }

    #[test]
    fn completed_accepts_boolean_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_completed(raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_completed(raw).unwrap(), "{raw}");
        }
        for raw in ["yes", "tRUE", "notabool", "2"] {
            assert!(parse_completed(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn body_decodes_first_value_only() {
        assert_eq!(
            decode_task(br#"{"name":"Edited","completed":true} {"name":"x"}"#).unwrap(),
            Task::new(0, "Edited", true)
        );
        assert_eq!(decode_task(b"null").unwrap(), Task::blank());
        assert!(decode_task(b"").is_err());
        assert!(decode_task(b"  \n").is_err());
        assert!(decode_task(b"{").is_err());
        assert!(decode_task(br#"{"completed":"yes"}"#).is_err());
    }
}
