use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, patch},
};
use db::{
    models::sla_policy::{SlaPolicy, UpdateSlaPolicy},
    types::TicketPriority,
};
use serde::Deserialize;
use tickets::Actor;
use uuid::Uuid;

use crate::{AppState, error::ApiError, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub priority: TicketPriority,
}

pub async fn list_policies(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<SlaPolicy>>>, ApiError> {
    let policies = state.tickets.list_policies(&actor).await?;
    Ok(ResponseJson(ApiResponse::success(policies)))
}

pub async fn resolve_policy(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<ResponseJson<ApiResponse<SlaPolicy>>, ApiError> {
    let policy = state.tickets.resolve_policy(&actor, query.priority).await?;
    Ok(ResponseJson(ApiResponse::success(policy)))
}

pub async fn update_policy(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(policy_id): Path<Uuid>,
    Json(payload): Json<UpdateSlaPolicy>,
) -> Result<ResponseJson<ApiResponse<SlaPolicy>>, ApiError> {
    actor.require_admin()?;
    let policy = state
        .tickets
        .update_policy(&actor, policy_id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(policy)))
}

pub async fn delete_policy(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(policy_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    actor.require_admin()?;
    state.tickets.delete_policy(&actor, policy_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    let inner = Router::new()
        .route("/", get(list_policies))
        .route("/resolve", get(resolve_policy))
        .route("/{policy_id}", patch(update_policy).delete(delete_policy));

    Router::new().nest("/sla-policies", inner)
}
