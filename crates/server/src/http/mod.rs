use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;

use crate::{AppState, routes};

pub mod auth;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(routes::tickets::router())
        .merge(routes::sla_policies::router())
        .merge(routes::members::router())
        .layer(from_fn_with_state(state.clone(), auth::require_actor));

    let api_routes = Router::new()
        .merge(routes::organizations::router())
        .merge(protected);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use test_support::setup_db;
    use tickets::TicketService;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::http::auth::TokenKeys;

    async fn setup_app() -> Router {
        let db = setup_db().await;
        router(AppState::new(
            TicketService::new(db),
            TokenKeys::new("test-secret", 1),
        ))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn sign_up(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/organizations",
            None,
            Some(json!({
                "name": "Acme Support",
                "owner": { "name": "Olive", "email": "olive@acme.test" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["policies"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"]["owner"]["role"], "OWNER");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_ticket(app: &Router, token: &str, title: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/tickets",
            Some(token),
            Some(json!({
                "title": title,
                "priority": "HIGH",
                "customerEmail": "pat@example.com"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = setup_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn api_requires_a_valid_token() {
        let app = setup_app().await;

        let (status, body) = send(&app, Method::GET, "/api/tickets", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) =
            send(&app, Method::GET, "/api/tickets", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_then_list_and_fetch() {
        let app = setup_app().await;
        let token = sign_up(&app).await;

        let first = create_ticket(&app, &token, "Printer on fire").await;
        create_ticket(&app, &token, "VPN drops").await;
        assert_eq!(first["number"], 1);
        assert_eq!(first["status"], "OPEN");

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/tickets?pageSize=1&priority=HIGH",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["total_pages"], 2);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["items"][0]["sla"]["status"], "ok");

        let id = first["id"].as_str().unwrap();
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/tickets/{id}/messages"),
            Some(&token),
            Some(json!({ "type": "REPLY", "body": "On it" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["body"], "On it");

        let (status, body) =
            send(&app, Method::GET, &format!("/api/tickets/{id}"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Printer on fire");
        assert!(!body["data"]["first_response_at"].is_null());
        assert_eq!(body["data"]["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_status_is_a_bad_request() {
        let app = setup_app().await;
        let token = sign_up(&app).await;
        let ticket = create_ticket(&app, &token, "Login loop").await;
        let id = ticket["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/tickets/{id}/status"),
            Some(&token),
            Some(json!({ "status": "ARCHIVED" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/tickets?status=ARCHIVED",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/tickets/{id}/status"),
            Some(&token),
            Some(json!({ "status": "RESOLVED" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["data"]["resolved_at"].is_null());
    }

    #[tokio::test]
    async fn missing_ticket_is_not_found() {
        let app = setup_app().await;
        let token = sign_up(&app).await;

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/tickets/{}", Uuid::new_v4()),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn organization_signup_validates_owner() {
        let app = setup_app().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/organizations",
            None,
            Some(json!({ "name": "Acme", "owner": { "name": " ", "email": "a@b.test" } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tickets_are_invisible_across_organizations() {
        let app = setup_app().await;
        let token = sign_up(&app).await;
        let other = sign_up(&app).await;
        let ticket = create_ticket(&app, &token, "Private").await;
        let id = ticket["id"].as_str().unwrap();

        let (status, _) =
            send(&app, Method::GET, &format!("/api/tickets/{id}"), Some(&other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::GET, "/api/tickets", Some(&other), None).await;
        assert_eq!(body["data"]["total"], 0);
    }

    #[tokio::test]
    async fn agents_cannot_delete_tickets() {
        let app = setup_app().await;
        let owner = sign_up(&app).await;
        let ticket = create_ticket(&app, &owner, "Refund request").await;
        let id = ticket["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/members",
            Some(&owner),
            Some(json!({ "name": "Avery", "email": "avery@acme.test", "role": "AGENT" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let agent = body["data"]["token"].as_str().unwrap().to_string();
        let agent_id = body["data"]["member"]["user_id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/members",
            Some(&agent),
            Some(json!({ "name": "Mallory", "email": "m@acme.test" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/tickets/{id}/assign"),
            Some(&agent),
            Some(json!({ "assigneeId": agent_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["assignee_id"], agent_id.as_str());

        let uri = format!("/api/tickets/{id}");
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&agent), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn policies_in_use_cannot_be_deleted() {
        let app = setup_app().await;
        let token = sign_up(&app).await;
        create_ticket(&app, &token, "Slow dashboard").await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/sla-policies/resolve?priority=HIGH",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["first_response_min"], 60);
        let policy_id = body["data"]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/sla-policies/{policy_id}");
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "firstResponseMin": 30 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["first_response_min"], 30);
    }
}
