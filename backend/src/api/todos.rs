//! Task endpoints: listing, creation and resolution.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{NewTodo, Todo, TodoAudience};
use crate::server::state::PortalState;

use super::clients::record_id_from_path;
use super::error::{ApiError, ApiResult};
use super::extract::CurrentActor;

/// Default number of rows for dashboard listings.
const DEFAULT_RECENT_LIMIT: usize = 5;

/// Dashboard listing limit.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentOpenParams {
    /// Maximum rows to return; defaults to 5.
    pub limit: Option<usize>,
}

/// Task creation payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTodoRequest {
    /// Short task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Audience the task is addressed to.
    pub audience: TodoAudience,
}

/// Tasks of one client visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/clients/{id}/todos",
    responses((status = 200, description = "Tasks in scope", body = [Todo])),
    tags = ["todos"],
    operation_id = "listClientTodos"
)]
#[get("/{id}/todos")]
pub async fn list_for_client(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Todo>>> {
    let client_id = record_id_from_path(&path)?;
    let todos = state.todos.list_for_client(&actor.0, &client_id).await?;
    Ok(web::Json(todos))
}

/// Raise a task against a client account.
///
/// The handler loads the client context and stamps the permission fields
/// onto the new record.
#[utoipa::path(
    post,
    path = "/api/clients/{id}/todos",
    request_body = NewTodoRequest,
    responses(
        (status = 201, description = "Task raised", body = Todo),
        (status = 403, description = "Caller may not create tasks", body = ApiError),
        (status = 404, description = "Unknown or out-of-scope client", body = ApiError)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/{id}/todos")]
pub async fn create(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<NewTodoRequest>,
) -> ApiResult<HttpResponse> {
    let client_id = record_id_from_path(&path)?;
    let client = state.clients.get(&actor.0, &client_id).await?;
    let payload = payload.into_inner();
    let created = state
        .todos
        .create(
            &actor.0,
            NewTodo {
                client_id: client.id.clone(),
                title: payload.title,
                description: payload.description,
                audience: payload.audience,
                linkage: client.linkage(),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Most recent open tasks visible to the caller.
#[utoipa::path(
    get,
    path = "/api/todos/recent-open",
    params(RecentOpenParams),
    responses((status = 200, description = "Recent open tasks", body = [Todo])),
    tags = ["todos"],
    operation_id = "recentOpenTodos"
)]
#[get("/recent-open")]
pub async fn recent_open(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    params: web::Query<RecentOpenParams>,
) -> ApiResult<web::Json<Vec<Todo>>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let todos = state.todos.recent_open(&actor.0, limit).await?;
    Ok(web::Json(todos))
}

/// Resolve an open task addressed to the caller.
#[utoipa::path(
    post,
    path = "/api/todos/{id}/resolve",
    responses(
        (status = 200, description = "Resolved task", body = Todo),
        (status = 403, description = "Caller is not in the audience", body = ApiError),
        (status = 409, description = "Task is not open", body = ApiError)
    ),
    tags = ["todos"],
    operation_id = "resolveTodo"
)]
#[post("/{id}/resolve")]
pub async fn resolve(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<Todo>> {
    let id = record_id_from_path(&path)?;
    let resolved = state.todos.resolve(&actor.0, &id).await?;
    Ok(web::Json(resolved))
}
