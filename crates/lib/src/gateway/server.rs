//! Webhook HTTP server.

use crate::channels::{signature, CallbackRequest, LineClient};
use crate::config::{self, Config};
use crate::gateway::dispatch;
use crate::llm::GeminiClient;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state for the gateway: config and the two outbound clients.
/// Read-only after startup; requests share it via Clone.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    /// Channel secret used to verify x-line-signature.
    channel_secret: Arc<String>,
    line: LineClient,
    gemini: GeminiClient,
}

/// Build the gateway state from config. Fails when a required credential
/// (channel secret, access token, Gemini API key) is missing.
fn build_state(config: Config) -> Result<GatewayState> {
    let channel_secret = config::resolve_channel_secret(&config)
        .context("LINE channel secret not configured (set ChannelSecret or channels.line.channelSecret)")?;
    let access_token = config::resolve_channel_access_token(&config).context(
        "LINE channel access token not configured (set ChannelAccessToken or channels.line.channelAccessToken)",
    )?;
    let api_key = config::resolve_gemini_api_key(&config)
        .context("Gemini API key not configured (set GOOGLE_GEMINI_API_KEY or gemini.apiKey)")?;

    let line = LineClient::new(
        access_token,
        config.channels.line.api_base.clone(),
        config.channels.line.blob_base.clone(),
    );
    let gemini = GeminiClient::new(
        api_key,
        config.gemini.base_url.clone(),
        config.gemini.model.clone(),
        config.gemini.vision_model.clone(),
    );
    Ok(GatewayState {
        config: Arc::new(config),
        channel_secret: Arc::new(channel_secret),
        line,
        gemini,
    })
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Blocks until shutdown (Ctrl+C or SIGTERM).
pub async fn run_gateway(config: Config) -> Result<()> {
    let bind = config.gateway.bind.trim().to_string();
    let port = config.gateway.port;
    let state = build_state(config)?;

    let app = Router::new()
        .route("/", get(health_http))
        .route("/callback", post(callback))
        .with_state(state);

    let bind_addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}

/// POST /callback — verify x-line-signature against the raw body, parse the
/// callback batch, and dispatch its events. 400 on a bad signature, 500 on a
/// malformed body, 200 after the batch has been handled.
async fn callback(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    log::info!("/callback called");
    let provided = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !signature::verify(&state.channel_secret, provided, &body) {
        log::warn!("webhook signature verification failed");
        return StatusCode::BAD_REQUEST;
    }
    let cb: CallbackRequest = match serde_json::from_slice(&body) {
        Ok(cb) => cb,
        Err(e) => {
            log::warn!("cannot parse callback body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };
    log::info!("handling {} event(s)", cb.events.len());
    dispatch::process_events(&state.line, &state.gemini, cb.events).await;
    StatusCode::OK
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
    }))
}
