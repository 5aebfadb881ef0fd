//! Authentication middleware for Axum
//!
//! Request-scoped gate in front of protected routes: extracts the bearer
//! token, asks the auth service to parse it, and injects the resulting
//! identity into the request extensions for downstream handlers.
//!
//! Status contract: no usable `Authorization` header → 401; malformed
//! header or unsupported scheme → 403; expired token → 401 (the client
//! should authenticate again); any other invalid token → 403.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::auth::{AuthError, AuthService};
use crate::interfaces::http::common::ApiResponse;

/// Authentication state shared by all protected routes
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// JWT authentication middleware - requires a valid bearer token
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // Exactly one Authorization header; zero or several count as absent.
    let (value, extra) = {
        let mut values = request.headers().get_all(header::AUTHORIZATION).iter();
        (values.next().cloned(), values.next().is_some())
    };

    let Some(value) = value else {
        return reject(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    if extra {
        return reject(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let Ok(value) = value.to_str() else {
        return reject(StatusCode::FORBIDDEN, "Invalid authorization header format");
    };

    let mut fields = value.split_whitespace();
    let (Some(scheme), Some(token)) = (fields.next(), fields.next()) else {
        return reject(StatusCode::FORBIDDEN, "Invalid authorization header format");
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return reject(StatusCode::FORBIDDEN, "Unsupported authorization type");
    }

    match state.auth.parse_token(token) {
        Ok(info) => {
            request.extensions_mut().insert(info);
            next.run(request).await
        }
        Err(AuthError::ExpiredToken) => reject(
            StatusCode::UNAUTHORIZED,
            "Token expired, please authorize again",
        ),
        Err(_) => reject(StatusCode::FORBIDDEN, "Invalid token"),
    }
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use tower::Service;

    use super::*;
    use crate::domain::user::mock::InMemoryUsers;
    use crate::domain::UserInfo;
    use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "testSigningKey".to_string(),
            token_ttl_hours: 3,
            issuer: "job-board".to_string(),
        }
    }

    async fn whoami(Extension(info): Extension<UserInfo>) -> Json<UserInfo> {
        Json(info)
    }

    fn app() -> Router {
        let auth = Arc::new(AuthService::new(
            Arc::new(InMemoryUsers::new()),
            test_config(),
            4,
        ));
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(
                AuthState { auth },
                auth_middleware,
            ))
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    fn request_with_auth(header_value: &str) -> Request<Body> {
        Request::builder()
            .uri("/whoami")
            .header(header::AUTHORIZATION, header_value)
            .body(Body::empty())
            .unwrap()
    }

    fn valid_token() -> String {
        let user = UserInfo {
            id: 7,
            roles: HashSet::from(["mod".to_string()]),
        };
        create_token(user, &test_config()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_returns_401() {
        let req = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();

        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn repeated_header_returns_401() {
        let token = valid_token();
        let req = Request::builder()
            .uri("/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn header_without_token_returns_403() {
        let resp = send(request_with_auth("Bearer")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unsupported_scheme_returns_403() {
        let resp = send(request_with_auth("Basic cm9vdDpyb290MQ==")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn tampered_token_returns_403() {
        let mut token = valid_token();
        token.replace_range(0..1, "/");

        let resp = send(request_with_auth(&format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn expired_token_returns_401() {
        use chrono::{Duration, Utc};
        use jsonwebtoken::{encode, EncodingKey, Header};

        use crate::infrastructure::crypto::jwt::Claims;

        let config = test_config();
        let claims = Claims {
            user: UserInfo {
                id: 7,
                roles: HashSet::new(),
            },
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(5)).timestamp(),
            iss: config.issuer.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let resp = send(request_with_auth(&format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_injects_identity() {
        let resp = send(request_with_auth(&format!("Bearer {}", valid_token()))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let info: UserInfo = serde_json::from_slice(&body).unwrap();
        assert_eq!(info.id, 7);
        assert!(info.roles.contains("mod"));
    }

    #[tokio::test]
    async fn scheme_comparison_is_case_insensitive() {
        let resp = send(request_with_auth(&format!("bearer {}", valid_token()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
