use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::member::{CreateMember, Member, MemberRole};
use serde::{Deserialize, Serialize};
use tickets::Actor;
use ts_rs::TS;
use uuid::Uuid;

use crate::{AppState, error::ApiError, response::ApiResponse};

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AddMember {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: MemberRole,
}

#[derive(Debug, Serialize, TS)]
pub struct MemberWithToken {
    pub member: Member,
    pub token: String,
}

pub async fn list_members(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Member>>>, ApiError> {
    let members = state.tickets.list_members(&actor).await?;
    Ok(ResponseJson(ApiResponse::success(members)))
}

pub async fn add_member(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Json(payload): Json<AddMember>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<MemberWithToken>>), ApiError> {
    actor.require_admin()?;

    let member = state
        .tickets
        .add_member(
            &actor,
            &CreateMember {
                user_id: payload.user_id.unwrap_or_else(Uuid::new_v4),
                name: payload.name.trim().to_string(),
                email: payload.email.trim().to_string(),
                role: payload.role,
            },
        )
        .await?;
    let token = state
        .tokens
        .issue(
            &Actor::new(member.user_id, member.org_id, member.role),
            state.tickets.now(),
        )
        .map_err(|err| ApiError::Internal(format!("Failed to issue token: {err}")))?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(MemberWithToken { member, token })),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/members", get(list_members).post(add_member))
}
