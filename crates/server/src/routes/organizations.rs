use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::post,
};
use db::models::member::{CreateMember, MemberRole};
use serde::{Deserialize, Serialize};
use tickets::{Actor, OrganizationCreated};
use ts_rs::TS;
use uuid::Uuid;

use crate::{AppState, error::ApiError, response::ApiResponse};

#[derive(Debug, Deserialize, TS)]
pub struct OwnerDetails {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateOrganization {
    pub name: String,
    pub owner: OwnerDetails,
}

/// A freshly provisioned tenant together with the owner's access token.
#[derive(Debug, Serialize, TS)]
pub struct OrganizationSignup {
    #[serde(flatten)]
    #[ts(flatten)]
    pub created: OrganizationCreated,
    pub token: String,
}

pub async fn create_organization(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganization>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<OrganizationSignup>>), ApiError> {
    let owner = CreateMember {
        user_id: Uuid::new_v4(),
        name: payload.owner.name.trim().to_string(),
        email: payload.owner.email.trim().to_string(),
        role: MemberRole::Owner,
    };
    if owner.name.is_empty() || owner.email.is_empty() {
        return Err(ApiError::BadRequest(
            "Owner name and email are required".to_string(),
        ));
    }

    let created = state
        .tickets
        .create_organization(&payload.name, &owner)
        .await?;
    let actor = Actor::new(
        created.owner.user_id,
        created.organization.id,
        created.owner.role,
    );
    let token = state
        .tokens
        .issue(&actor, state.tickets.now())
        .map_err(|err| ApiError::Internal(format!("Failed to issue token: {err}")))?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(OrganizationSignup { created, token })),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/organizations", post(create_organization))
}
