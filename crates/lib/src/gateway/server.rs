//! Gateway HTTP server (single port).

use crate::activity::Activity;
use crate::bot::Bot;
use crate::channels::{ConnectorClient, ConnectorTurn, TokenProvider};
use crate::config::Config;
use crate::light::LightClient;
use crate::state::ConversationStateStore;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Queue depth between the HTTP handler and the processor task.
const INBOUND_QUEUE: usize = 64;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
struct GatewayState {
    config: Arc<Config>,
    /// Parsed activities for the processor task.
    inbound_tx: mpsc::Sender<Activity>,
}

/// Messages endpoint path, always with a leading slash.
pub fn messages_route(config: &Config) -> String {
    let path = config.gateway.messages_path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Run the gateway until SIGINT/SIGTERM. Fails fast when no light URL is configured.
pub async fn run_gateway(config: Config) -> Result<()> {
    let light_url = config
        .light
        .url
        .clone()
        .filter(|u| !u.trim().is_empty())
        .context("light URL not configured (set URL or light.url)")?;
    let light = Arc::new(LightClient::new(light_url));
    log::info!("light endpoint: {}", light.url());

    let tokens = match config.bot.credentials() {
        Some(credentials) => {
            let provider = TokenProvider::new(credentials);
            log::info!("connector auth enabled for app {}", provider.app_id());
            Some(provider)
        }
        None => {
            log::warn!("no app credentials configured; replies are sent without auth (emulator mode)");
            None
        }
    };
    let connector = Arc::new(ConnectorClient::new(tokens));
    let bot = Arc::new(Bot::new(light, Arc::new(ConversationStateStore::new())));

    let (inbound_tx, mut inbound_rx) = mpsc::channel::<Activity>(INBOUND_QUEUE);
    // Each activity gets its own task so a hung light or connector call stalls only that turn.
    let processor = tokio::spawn(async move {
        let mut turns = JoinSet::new();
        loop {
            tokio::select! {
                next = inbound_rx.recv() => {
                    let Some(activity) = next else { break };
                    let bot = bot.clone();
                    let turn = ConnectorTurn::new(activity, connector.clone());
                    turns.spawn(async move { bot.on_turn(&turn).await });
                }
                Some(done) = turns.join_next(), if !turns.is_empty() => {
                    if let Err(e) = done {
                        log::warn!("activity handler ended abnormally: {}", e);
                    }
                }
            }
        }
        log::debug!("inbound queue closed, waiting for {} handler(s)", turns.len());
        while let Some(done) = turns.join_next().await {
            if let Err(e) = done {
                log::warn!("activity handler ended abnormally: {}", e);
            }
        }
    });

    let route = messages_route(&config);
    let state = GatewayState {
        config: Arc::new(config.clone()),
        inbound_tx,
    };
    let app = Router::new()
        .route("/", get(health_http))
        .route(&route, post(messages))
        .with_state(state);

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {} (messages at {})", bind_addr, route);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;

    // The router (and its sender) is dropped with the server, so the queue drains and closes.
    if let Err(e) = processor.await {
        log::warn!("processor task ended abnormally: {}", e);
    }
    log::info!("gateway stopped");
    Ok(())
}

/// Completes on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining queued activities");
}

/// POST {messages path}: parse the activity and queue it; the reply goes out through the connector.
async fn messages(State(state): State<GatewayState>, body: Bytes) -> StatusCode {
    let activity: Activity = match serde_json::from_slice(&body) {
        Ok(a) => a,
        Err(e) => {
            log::debug!("rejecting malformed activity: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    if state.inbound_tx.send(activity).await.is_err() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
    }))
}
