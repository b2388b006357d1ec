use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        extract::State,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
};

use crate::{
    error::ApiError,
    live::{live_off_handler, live_on_handler, live_status_handler},
    relay::FanMessage,
    state::GatewayState,
};

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/live-status", get(live_status_handler))
        .route("/live/on", get(live_on_handler))
        .route("/live/off", get(live_off_handler))
        .route("/fan-message", post(fan_message_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until it fails.
pub async fn start_gateway(bind: &str, port: u16, state: Arc<GatewayState>) -> anyhow::Result<()> {
    let app = build_gateway_app(Arc::clone(&state));

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Startup banner.
    let lines = [
        format!("onair gateway v{}", state.version),
        format!("listening on {addr}"),
        format!(
            "live control: {}",
            if state.control.is_permissive() {
                "open (no key)"
            } else {
                "shared key"
            }
        ),
        format!(
            "fan relay: {}",
            if state.relay.is_configured() {
                "enabled"
            } else {
                "disabled"
            }
        ),
    ];
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "isLive": state.control.status().is_live,
    }))
}

async fn fan_message_handler(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<FanMessage>,
) -> Result<impl IntoResponse, ApiError> {
    state.relay.relay(&body).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::relay::FanRelay,
        axum::{
            body::{Body, to_bytes},
            http::{HeaderMap, Request, StatusCode, header},
        },
        mockito::Matcher,
        onair_channels::WebhookOutbound,
        onair_live::{ControlGateway, LiveStore},
        serde_json::{Value, json},
        tower::ServiceExt,
    };

    fn app_with(control: ControlGateway, relay: FanRelay) -> (Router, Arc<GatewayState>) {
        let state = GatewayState::new(Arc::new(control), relay);
        (build_gateway_app(Arc::clone(&state)), state)
    }

    fn open_app() -> (Router, Arc<GatewayState>) {
        app_with(
            ControlGateway::new(Arc::new(LiveStore::new())),
            FanRelay::new(None),
        )
    }

    fn keyed_app() -> (Router, Arc<GatewayState>) {
        app_with(
            ControlGateway::new(Arc::new(LiveStore::new())).with_control_key(Some("abc123")),
            FanRelay::new(None),
        )
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn live_status_starts_off_and_is_not_cached() {
        let (app, _) = open_app();
        let (status, headers, body) = get_json(&app, "/live-status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "isLive": false, "updatedAt": null, "source": "manual" })
        );
        let cache = headers[header::CACHE_CONTROL].to_str().unwrap();
        assert!(cache.contains("no-store"));
        assert!(cache.contains("no-cache"));
        assert_eq!(headers[header::PRAGMA], "no-cache");
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let (app, _) = open_app();
        get_json(&app, "/live/on").await;

        let (_, _, first) = get_json(&app, "/live-status").await;
        let (_, _, second) = get_json(&app, "/live-status").await;
        assert_eq!(first, second);
        assert!(first["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn open_mode_toggles_without_key() {
        let (app, state) = open_app();

        let (status, _, body) = get_json(&app, "/live/on").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["isLive"], true);
        assert_eq!(body["source"], "control-url");
        assert!(body["updatedAt"].is_string());

        let (status, _, body) = get_json(&app, "/live/off?key=anything").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isLive"], false);
        assert!(!state.control.status().is_live);
    }

    #[tokio::test]
    async fn keyed_mode_rejects_bad_keys() {
        let (app, state) = keyed_app();
        let before = state.control.status();

        for uri in ["/live/on", "/live/on?key=", "/live/on?key=abc124", "/live/on?other=abc123"] {
            let (status, _, body) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body, json!({ "error": "Unauthorized" }));
        }
        assert_eq!(state.control.status(), before);

        let (status, _, body) = get_json(&app, "/live/on?key=abc123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isLive"], true);

        let (_, _, status_body) = get_json(&app, "/live-status").await;
        assert_eq!(status_body["isLive"], true);
        assert_eq!(status_body["source"], "control-url");
    }

    #[tokio::test]
    async fn repeated_key_is_accepted_in_open_mode() {
        let (app, state) = open_app();
        let (status, _, body) = get_json(&app, "/live/on?key=a&key=b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isLive"], true);
        assert!(state.control.status().is_live);
    }

    #[tokio::test]
    async fn repeated_key_uses_first_value_in_keyed_mode() {
        let (app, state) = keyed_app();

        let (status, _, body) = get_json(&app, "/live/on?key=wrong&key=abc123").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Unauthorized" }));
        assert!(!state.control.status().is_live);

        let (status, _, body) = get_json(&app, "/live/on?key=abc123&key=wrong").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isLive"], true);
    }

    #[tokio::test]
    async fn health_reports_live_flag() {
        let (app, _) = open_app();
        get_json(&app, "/live/on").await;
        let (status, _, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["isLive"], true);
    }

    #[tokio::test]
    async fn fan_message_requires_text() {
        let (app, _) = open_app();
        let (status, body) = post_json(&app, "/fan-message", json!({ "name": "Sam" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message is required");
    }

    #[tokio::test]
    async fn fan_message_without_webhook_is_unavailable() {
        let (app, _) = open_app();
        let (status, body) = post_json(&app, "/fan-message", json!({ "message": "hi" })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Relay not configured");
    }

    #[tokio::test]
    async fn fan_message_is_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/fan")
            .match_body(Matcher::PartialJson(json!({
                "content": "💬 **Fan message from Anonymous**\nlove the stream",
            })))
            .with_status(204)
            .create_async()
            .await;

        let sink = WebhookOutbound::from_url(Some(&format!("{}/fan", server.url()))).unwrap();
        let (app, _) = app_with(
            ControlGateway::new(Arc::new(LiveStore::new())),
            FanRelay::new(Some(Arc::new(sink))),
        );

        let (status, body) =
            post_json(&app, "/fan-message", json!({ "message": " love the stream " })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fan_message_delivery_failure_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/fan")
            .with_status(500)
            .create_async()
            .await;

        let sink = WebhookOutbound::from_url(Some(&format!("{}/fan", server.url()))).unwrap();
        let (app, _) = app_with(
            ControlGateway::new(Arc::new(LiveStore::new())),
            FanRelay::new(Some(Arc::new(sink))),
        );

        let (status, body) = post_json(&app, "/fan-message", json!({ "message": "hi" })).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Failed to deliver message");
    }
}
