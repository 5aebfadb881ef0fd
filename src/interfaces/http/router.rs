//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::auth::AuthService;
use crate::application::profile::ProfileService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, health, profile};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        // Profile
        profile::get_profile,
        profile::update_profile,
        profile::change_password,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthStatus,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::TokenResponse,
            // Profile
            profile::ProfileResponse,
            profile::UpdateProfileRequest,
            profile::ChangePasswordRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User registration and login (JWT)"),
        (name = "Profile", description = "Own profile: read, update, change password"),
    ),
    info(
        title = "Job Board API",
        version = "1.0.0",
        description = "REST API for the job-board backend",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(auth: Arc<AuthService>, profile: Arc<ProfileService>) -> Router {
    let middleware_state = AuthState {
        auth: Arc::clone(&auth),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth::AuthHandlerState { auth });

    // Profile routes (protected)
    let profile_routes = Router::new()
        .route(
            "/",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/password", put(profile::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(profile::ProfileHandlerState { profile });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Auth
        .nest("/api/v1/auth", auth_routes)
        // Profile
        .nest("/api/v1/profile", profile_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
