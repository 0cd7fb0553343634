//! Axum HTTP handlers for the web server
//!
//! Provides the direct Model Context Protocol endpoint, the event-stream
//! transport pair (`/sse` + `/messages`), and general metadata endpoints.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::{stream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::http::sessions::OpenSession;
use crate::mcp::rpc::{is_method_not_found, json_rpc_error};
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub mcp_endpoint: &'static str,
    pub sse_endpoint: &'static str,
    pub messages_endpoint: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        mcp_endpoint: "/mcp",
        sse_endpoint: "/sse",
        messages_endpoint: "/messages",
    })
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::OK,
                Json(json_rpc_error(None, -32700, "Parse error")),
            )
                .into_response()
        }
    };

    if let Some(batch) = payload.as_array() {
        if batch.is_empty() {
            return (
                StatusCode::OK,
                Json(vec![json_rpc_error(None, -32600, "Invalid Request")]),
            )
                .into_response();
        }

        let mut responses = Vec::new();
        for item in batch {
            if let Some(response) = handle_json_rpc_value(&state, item.clone()).await {
                responses.push(response);
            }
        }

        if responses.is_empty() {
            return StatusCode::NO_CONTENT.into_response();
        }

        return (StatusCode::OK, Json(Value::Array(responses))).into_response();
    }

    match handle_json_rpc_value(&state, payload).await {
        Some(response) => {
            // unknown methods surface as a transport-level 404 here
            let status = if is_method_not_found(&response) {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, Json(response)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn sse_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let OpenSession {
        id,
        receiver,
        guard,
    } = state.sessions.open();
    info!(session_id = %id, "sse session opened");

    let endpoint_path = format!("/messages?sessionId={id}");
    let endpoint_event =
        stream::once(async move { Ok(Event::default().event("endpoint").data(endpoint_path)) });

    // the guard travels with the stream state so client disconnects close
    // the session
    let message_events = stream::unfold((receiver, guard), |(mut receiver, guard)| async move {
        let payload = receiver.recv().await?;
        Some((
            Ok(Event::default().event("message").data(payload)),
            (receiver, guard),
        ))
    });

    Sse::new(endpoint_event.chain(message_events)).keep_alive(KeepAlive::default())
}

pub async fn messages_endpoint(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if !state.sessions.contains(&query.session_id) {
        return Err(AppError::session_not_found(&query.session_id));
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            deliver(
                &state,
                &query.session_id,
                json_rpc_error(None, -32700, "Parse error"),
            )
            .await;
            return Ok(StatusCode::ACCEPTED);
        }
    };

    if let Some(response) = handle_json_rpc_value(&state, payload).await {
        deliver(&state, &query.session_id, response).await;
    }

    Ok(StatusCode::ACCEPTED)
}

async fn deliver(state: &AppState, session_id: &str, response: Value) {
    let payload = serde_json::to_string(&response).expect("jsonrpc response serialization");
    if let Err(err) = state.sessions.dispatch(session_id, payload).await {
        // session died mid-request; the response is discarded
        debug!(session_id = %session_id, error = %err, "response discarded for closed session");
    }
}
