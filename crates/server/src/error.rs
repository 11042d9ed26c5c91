use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbErr;
use thiserror::Error;
use tickets::TicketError;

use crate::response::ApiResponse;

#[derive(Debug, Error, ts_rs::TS)]
#[ts(type = "string")]
pub enum ApiError {
    #[error(transparent)]
    Ticket(#[from] TicketError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Ticket(err) => match err {
                TicketError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "InvalidStatus"),
                TicketError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
                TicketError::InvalidAssignee(_) => (StatusCode::BAD_REQUEST, "InvalidAssignee"),
                TicketError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
                TicketError::Forbidden(_) => (StatusCode::FORBIDDEN, "ForbiddenError"),
                TicketError::ConflictingState(_) => (StatusCode::CONFLICT, "ConflictError"),
                TicketError::PolicyInUse(_) => (StatusCode::CONFLICT, "PolicyInUse"),
                TicketError::StoreUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "StoreUnavailable")
                }
            },
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        let error_message = match &self {
            ApiError::Ticket(TicketError::StoreUnavailable(_)) => {
                "The ticket store is temporarily unavailable. Please retry.".to_string()
            }
            ApiError::Ticket(err) => err.to_string(),
            ApiError::Unauthorized => "Unauthorized. Please sign in again.".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use uuid::Uuid;

    use super::*;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn ticket_errors_map_to_statuses() {
        let cases = [
            (TicketError::InvalidStatus("X".into()), StatusCode::BAD_REQUEST),
            (TicketError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (TicketError::InvalidAssignee(Uuid::nil()), StatusCode::BAD_REQUEST),
            (TicketError::NotFound("Ticket not found".into()), StatusCode::NOT_FOUND),
            (TicketError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (TicketError::ConflictingState("stale".into()), StatusCode::CONFLICT),
            (TicketError::PolicyInUse(2), StatusCode::CONFLICT),
            (
                TicketError::StoreUnavailable(DbErr::Custom("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = render(err.into()).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn body_uses_the_envelope() {
        let (status, body) =
            render(TicketError::NotFound("Ticket not found".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Ticket not found");
        assert!(body["data"].is_null());

        let (_, body) = render(
            TicketError::StoreUnavailable(DbErr::Custom("secret detail".into())).into(),
        )
        .await;
        assert!(!body["message"].as_str().unwrap().contains("secret detail"));
    }
}
