use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::{errors::AppError, AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

const STRUCTURED_TOKEN_PREFIX: &str = "mcp";
const MIN_STRUCTURED_SEGMENTS: usize = 3;
const MIN_STRUCTURED_TOKEN_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub token: Option<String>,
}

/// Credential presented by a request, in precedence order.
///
/// A present but malformed source still counts as present: it blocks
/// fallback to lower-precedence sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(Option<String>),
    ApiKey(Option<String>),
    QueryToken(String),
    Missing,
}

impl Credential {
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Bearer(token) | Self::ApiKey(token) => token.as_deref(),
            Self::QueryToken(token) => Some(token),
            Self::Missing => None,
        }
    }
}

pub fn extract_credential(headers: &HeaderMap, query_token: Option<String>) -> Credential {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let bearer = value
            .to_str()
            .ok()
            .and_then(|raw| raw.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        return Credential::Bearer(bearer);
    }

    if let Some(value) = headers.get(API_KEY_HEADER) {
        let key = value
            .to_str()
            .ok()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        return Credential::ApiKey(key);
    }

    match query_token {
        Some(token) => Credential::QueryToken(token),
        None => Credential::Missing,
    }
}

/// Accepts tokens from the configured set verbatim, or on structured shape
/// alone (`mcp` prefix, at least three `_`-separated segments, 32+ chars).
/// An empty configured set fails closed.
pub fn is_token_acceptable(token: &str, accepted_tokens: &[String]) -> bool {
    if accepted_tokens.is_empty() {
        return false;
    }

    if accepted_tokens.iter().any(|accepted| accepted == token) {
        return true;
    }

    has_structured_shape(token)
}

fn has_structured_shape(token: &str) -> bool {
    if token.len() < MIN_STRUCTURED_TOKEN_LEN {
        return false;
    }

    let segments: Vec<&str> = token.split('_').collect();
    segments.len() >= MIN_STRUCTURED_SEGMENTS && segments[0] == STRUCTURED_TOKEN_PREFIX
}

pub async fn require_access_token(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.auth_enabled {
        return Ok(next.run(request).await);
    }

    let credential = extract_credential(request.headers(), query.token);
    if matches!(credential, Credential::Missing) {
        return Err(AppError::unauthorized(
            "missing_token",
            "missing access token",
        ));
    }

    match credential.token() {
        Some(token) if is_token_acceptable(token, &state.config.api_tokens) => {
            Ok(next.run(request).await)
        }
        _ => Err(AppError::unauthorized(
            "invalid_token",
            "invalid access token",
        )),
    }
}
