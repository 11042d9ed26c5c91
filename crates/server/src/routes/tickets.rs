use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, patch},
};
use db::models::{
    message::{CreateMessage, Message},
    ticket::Ticket,
};
use serde::{Deserialize, Serialize};
use tickets::{
    Actor, CreateTicket, TicketDetail, TicketListParams, TicketPage, TicketWithSla, UpdateTicket,
};
use ts_rs::TS;
use uuid::Uuid;

use crate::{AppState, error::ApiError, response::ApiResponse};

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ChangeStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct AssignTicket {
    #[serde(alias = "assigneeId")]
    pub assignee_id: Option<Uuid>,
}

pub async fn list_tickets(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> Result<ResponseJson<ApiResponse<TicketPage<TicketWithSla>>>, ApiError> {
    let query = params.parse()?;
    let page = state
        .tickets
        .list_tickets(&actor, &query.filters, query.sort, query.page)
        .await?;
    Ok(ResponseJson(ApiResponse::success(page)))
}

pub async fn create_ticket(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Json(payload): Json<CreateTicket>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Ticket>>), ApiError> {
    let ticket = state.tickets.create_ticket(&actor, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(ticket))))
}

pub async fn get_ticket(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<TicketDetail>>, ApiError> {
    let detail = state.tickets.get_ticket(&actor, ticket_id).await?;
    Ok(ResponseJson(ApiResponse::success(detail)))
}

pub async fn update_ticket(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(payload): Json<UpdateTicket>,
) -> Result<ResponseJson<ApiResponse<Ticket>>, ApiError> {
    let ticket = state
        .tickets
        .update_ticket(&actor, ticket_id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(ticket)))
}

pub async fn delete_ticket(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    actor.require_admin()?;
    state.tickets.delete_ticket(&actor, ticket_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn change_status(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(payload): Json<ChangeStatus>,
) -> Result<ResponseJson<ApiResponse<Ticket>>, ApiError> {
    let ticket = state
        .tickets
        .transition_status(&actor, ticket_id, &payload.status)
        .await?;
    Ok(ResponseJson(ApiResponse::success(ticket)))
}

pub async fn assign_ticket(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(payload): Json<AssignTicket>,
) -> Result<ResponseJson<ApiResponse<Ticket>>, ApiError> {
    let ticket = state
        .tickets
        .assign_ticket(&actor, ticket_id, payload.assignee_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(ticket)))
}

pub async fn list_messages(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Message>>>, ApiError> {
    let messages = state.tickets.list_messages(&actor, ticket_id).await?;
    Ok(ResponseJson(ApiResponse::success(messages)))
}

pub async fn create_message(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(payload): Json<CreateMessage>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Message>>), ApiError> {
    let message = state
        .tickets
        .record_message(&actor, ticket_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(message))))
}

pub fn router() -> Router<AppState> {
    let ticket_id_router = Router::new()
        .route("/", get(get_ticket).patch(update_ticket).delete(delete_ticket))
        .route("/status", patch(change_status))
        .route("/assign", patch(assign_ticket))
        .route("/messages", get(list_messages).post(create_message));

    let inner = Router::new()
        .route("/", get(list_tickets).post(create_ticket))
        .nest("/{ticket_id}", ticket_id_router);

    Router::new().nest("/tickets", inner)
}
