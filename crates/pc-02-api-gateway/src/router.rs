//! HTTP routes and handlers.
//!
//! | Route         | Result                                                   |
//! |---------------|----------------------------------------------------------|
//! | `GET /`       | 200, whole chain                                         |
//! | `POST /`      | 201 with the produced record, 400 on a malformed body    |
//! | `GET /health` | 200 liveness document                                    |

use crate::domain::config::{GatewayConfig, RejectionStatus};
use crate::domain::error::INTERNAL_SERVER_ERROR_BODY;
use crate::middleware::{TimeoutLayer, TracingLayer};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use pc_01_ledger::{LedgerApi, SubmitOutcome};
use serde::Serialize;
use shared_types::{to_pretty_json, SubmissionMessage};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Ledger every handler reads from and submits to
    pub ledger: Arc<dyn LedgerApi>,
    /// Status returned with a record the ledger refused
    pub rejection_status: RejectionStatus,
}

/// Build the HTTP router with its middleware stack.
pub fn build_router(ledger: Arc<dyn LedgerApi>, config: &GatewayConfig) -> Router {
    let state = AppState {
        ledger,
        rejection_status: config.rejection_status,
    };

    let middleware = ServiceBuilder::new()
        .layer(TracingLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout));

    Router::new()
        .route("/", get(get_chain).post(submit_reading))
        .route("/health", get(health_check))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}

/// `GET /`: every record, pretty-printed, in chain order.
async fn get_chain(State(state): State<AppState>) -> Response {
    let blocks = state.ledger.blocks().await;
    match to_pretty_json(&blocks) {
        Ok(body) => json_body(StatusCode::OK, body),
        Err(e) => {
            error!(error = %e, "Failed to encode chain");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// `POST /`: produce a record for the submitted BPM.
async fn submit_reading(State(state): State<AppState>, body: Bytes) -> Response {
    let message = match decode_submission(&body) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "Malformed submission");
            return respond_with_json(StatusCode::BAD_REQUEST, &SubmissionMessage::default());
        }
    };

    match state.ledger.submit(message.bpm).await {
        Ok(SubmitOutcome::Accepted(block)) => respond_with_json(StatusCode::CREATED, &block),
        Ok(SubmitOutcome::Rejected { block, reason }) => {
            warn!(index = block.index, %reason, "Submission not appended");
            respond_with_json(state.rejection_status.status_code(), &block)
        }
        Err(e) if e.is_mining_abort() => {
            warn!(error = %e, "Mining aborted");
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
        Err(e) => {
            error!(error = %e, "Submission failed");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_BODY).into_response()
        }
    }
}

/// `GET /health`
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "api-gateway",
        "version": crate::VERSION,
        "length": state.ledger.blocks().await.len(),
    }))
}

/// Decode the first JSON value in `body`; trailing bytes are ignored.
pub fn decode_submission(body: &[u8]) -> serde_json::Result<SubmissionMessage> {
    serde_json::Deserializer::from_slice(body)
        .into_iter::<SubmissionMessage>()
        .next()
        .unwrap_or_else(|| Err(serde::de::Error::custom("EOF")))
}

/// Encode `payload` or fall back to a fixed 500.
fn respond_with_json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Response {
    match to_pretty_json(payload) {
        Ok(body) => json_body(status, body),
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_BODY).into_response()
        }
    }
}

fn json_body(status: StatusCode, body: String) -> Response {
    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
