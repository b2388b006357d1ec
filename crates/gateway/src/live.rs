//! Live status read path and HTTP control adapter.

use std::sync::Arc;

use {
    axum::{
        Json,
        extract::{Query, State},
        http::{HeaderName, header},
        response::{IntoResponse, Response},
    },
    onair_live::LiveState,
    serde::Serialize,
};

use crate::{error::ApiError, state::GatewayState};

/// Headers that keep browsers and proxies from caching live status.
pub const NO_CACHE: [(HeaderName, &str); 3] = [
    (
        header::CACHE_CONTROL,
        "no-store, no-cache, must-revalidate, max-age=0",
    ),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// Raw query pairs of a control request. Kept as a list so repeated
/// parameters reach the auth check instead of failing extraction.
pub type ControlQuery = Vec<(String, String)>;

/// First `key` value in the query, if any.
pub fn control_key(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .find(|(name, _)| name == "key")
        .map(|(_, value)| value.as_str())
}

#[derive(Debug, Serialize)]
struct ControlResponse {
    ok: bool,
    #[serde(flatten)]
    state: LiveState,
}

pub async fn live_status_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    (NO_CACHE, Json(state.control.status()))
}

pub async fn live_on_handler(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<ControlQuery>,
) -> Result<Response, ApiError> {
    set_live(&state, true, query)
}

pub async fn live_off_handler(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<ControlQuery>,
) -> Result<Response, ApiError> {
    set_live(&state, false, query)
}

fn set_live(
    state: &GatewayState,
    is_live: bool,
    query: ControlQuery,
) -> Result<Response, ApiError> {
    let live = state.control.control_url(is_live, control_key(&query))?;
    Ok((NO_CACHE, Json(ControlResponse {
        ok: true,
        state: live,
    }))
    .into_response())
}
