use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod stdio;
pub mod weather_client;

use config::Config;
use http::sessions::SessionManager;
use weather_client::WeatherProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: Arc<dyn WeatherProvider>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(config: Config, weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            config: Arc::new(config),
            weather,
            sessions: Arc::new(SessionManager::new()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .route("/sse", get(http::handlers::sse_stream))
        .route("/messages", post(http::handlers::messages_endpoint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_access_token,
        ));

    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .merge(protected)
        .layer(cors_layer(&state.config))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(auth::API_KEY_HEADER),
        ])
}
