//! Request translation and response mapping.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use domain::{HttpMethod, InboundEvent, StateSaveError};
use handlers::WebhookDispatcher;
use tracing::{debug, error, warn};

/// Default bound on handling one request end to end.
pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(45);

const INTERNAL_ERROR_BODY: &str = "Internal server error";
const TIMEOUT_BODY: &str = "Request timed out";

#[derive(Clone)]
struct ListenerState {
    dispatcher: Arc<WebhookDispatcher>,
    invocation_timeout: Duration,
}

/// Builds the receiver's router.
///
/// Both `/` and `/webhook` accept every method; method filtering happens in
/// the dispatcher after the signature check so that unsigned requests all look
/// the same to a caller.
pub fn webhook_router(dispatcher: Arc<WebhookDispatcher>, invocation_timeout: Duration) -> Router {
    let state = ListenerState {
        dispatcher,
        invocation_timeout,
    };

    Router::new()
        .route("/", any(webhook_handler))
        .route("/webhook", any(webhook_handler))
        .with_state(state)
}

async fn webhook_handler(
    State(state): State<ListenerState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = to_inbound_event(&method, &headers, body);

    match tokio::time::timeout(state.invocation_timeout, state.dispatcher.dispatch(event)).await {
        Ok(Ok(response)) => {
            let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                response.body,
            )
                .into_response()
        }
        Ok(Err(err)) => error_response(&err),
        Err(_) => {
            error!(
                timeout_secs = state.invocation_timeout.as_secs(),
                "Invocation deadline exceeded"
            );
            (StatusCode::GATEWAY_TIMEOUT, TIMEOUT_BODY).into_response()
        }
    }
}

/// Copies method, headers, and the raw body into a domain event.
///
/// Header values that are not valid UTF-8 are dropped; neither signature
/// header can legitimately contain them.
fn to_inbound_event(method: &Method, headers: &HeaderMap, body: Bytes) -> InboundEvent {
    let pairs = headers.iter().filter_map(|(name, value)| match value.to_str() {
        Ok(v) => Some((name.as_str(), v.to_string())),
        Err(_) => {
            debug!(header = %name, "Dropping non UTF-8 header value");
            None
        }
    });

    InboundEvent::new(HttpMethod::parse(method.as_str()), pairs, body.to_vec())
}

fn error_response(err: &StateSaveError) -> Response {
    if err.is_client_error() {
        warn!(error = %err, "Rejecting request");
        return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
    }

    error!(error = %err, "Failed to handle webhook");
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
