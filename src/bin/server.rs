//! Webhook server binary
//!
//! Wires the dialog engine to the WhatsApp Cloud API webhook: the GET
//! verification handshake, the POST message receiver, a health route, and an
//! operator route listing sessions waiting on a human.

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use helpdesk_dialog::{
    gateway, webhook, Config, DialogEngine, Session, SessionQuery, SessionQueryHandler,
    SessionQueryResult, SessionStore, VerifyParams, WebhookPayload,
};

#[derive(Clone)]
struct AppState {
    engine: Arc<DialogEngine>,
    queries: Arc<SessionQueryHandler>,
    verify_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    if !config.gateway_configured() {
        info!("WHATSAPP_TOKEN / PHONE_NUMBER_ID not set, replies will be logged and dropped");
    }

    let store = Arc::new(SessionStore::new());
    let engine = Arc::new(DialogEngine::new(
        store.clone(),
        gateway::for_config(&config),
    ));
    let queries = Arc::new(SessionQueryHandler::new(store));

    let state = AppState {
        engine,
        queries,
        verify_token: config.verify_token.clone(),
    };

    let app = Router::new()
        .route("/", get(health))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .route("/handoffs", get(pending_handoffs))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "webhook server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "helpdesk bot online"
}

async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    match params.check(state.verify_token.as_deref()) {
        Some(challenge) => (StatusCode::OK, challenge.to_string()),
        None => (StatusCode::FORBIDDEN, String::new()),
    }
}

// The platform re-delivers on non-2xx responses, so once a payload has been
// accepted this always answers 200, whatever happens downstream.
async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    let Ok(payload) = serde_json::from_value::<WebhookPayload>(payload) else {
        return StatusCode::OK;
    };
    let Some(message) = webhook::extract(payload) else {
        return StatusCode::OK;
    };

    if let Err(err) = state.engine.handle(message).await {
        error!(error = %err, "webhook processing failed");
    }
    StatusCode::OK
}

async fn pending_handoffs(State(state): State<AppState>) -> Json<Vec<Session>> {
    match state.queries.execute(SessionQuery::GetPendingHandoffs).await {
        SessionQueryResult::Sessions(sessions) => Json(sessions),
        _ => Json(Vec::new()),
    }
}
