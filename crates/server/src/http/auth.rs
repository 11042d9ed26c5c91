use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use db::types::MemberRole;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tickets::Actor;
use uuid::Uuid;

use crate::{AppState, response::ApiResponse};

/// Claims carried by an access token. `sub` is the user, `org` the tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub org: Uuid,
    pub role: MemberRole,
    pub iat: i64,
    pub exp: i64,
}

impl From<&Claims> for Actor {
    fn from(claims: &Claims) -> Self {
        Actor::new(claims.sub, claims.org, claims.role)
    }
}

/// HMAC keys used to sign and check access tokens.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn issue(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: actor.user_id,
            org: actor.org_id,
            role: actor.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::default()).map(|data| data.claims)
    }
}

fn parse_authorization_bearer(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let (prefix, rest) = trimmed.split_once(' ')?;
    if !prefix.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn reject(req: &Request, reason: &str) -> Response {
    tracing::warn!(
        path = %req.uri().path(),
        method = %req.method(),
        reason,
        "Unauthorized API request"
    );
    let response = ApiResponse::<()>::error("Unauthorized");
    (StatusCode::UNAUTHORIZED, Json(response)).into_response()
}

/// Resolves the bearer token into an [`Actor`] request extension.
pub async fn require_actor(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_authorization_bearer)
    else {
        return reject(&req, "missing_token");
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected access token");
            return reject(&req, "invalid_token");
        }
    };

    req.extensions_mut().insert(Actor::from(&claims));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_case_insensitive() {
        assert_eq!(parse_authorization_bearer("Bearer abc"), Some("abc"));
        assert_eq!(parse_authorization_bearer("  bearer   abc  "), Some("abc"));
        assert_eq!(parse_authorization_bearer("Basic abc"), None);
        assert_eq!(parse_authorization_bearer("Bearer "), None);
        assert_eq!(parse_authorization_bearer("abc"), None);
    }

    #[test]
    fn issued_tokens_verify() {
        let keys = TokenKeys::new("secret", 24);
        let actor = Actor::new(Uuid::new_v4(), Uuid::new_v4(), MemberRole::Admin);
        let token = keys.issue(&actor, Utc::now()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(Actor::from(&claims), actor);
    }

    #[test]
    fn expired_or_foreign_tokens_fail() {
        let keys = TokenKeys::new("secret", 1);
        let actor = Actor::new(Uuid::new_v4(), Uuid::new_v4(), MemberRole::Agent);

        let stale = keys.issue(&actor, Utc::now() - Duration::hours(3)).unwrap();
        assert!(keys.verify(&stale).is_err());

        let other = TokenKeys::new("another-secret", 1);
        let foreign = other.issue(&actor, Utc::now()).unwrap();
        assert!(keys.verify(&foreign).is_err());
    }
}
