//! WhatsApp webhook server
//!
//! Receives Twilio-style form posts, skips delivery receipts and empty
//! messages, runs a reply cycle and answers with TwiML.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::conversational::ConversationOrchestrator;

pub const FALLBACK_REPLY: &str = "My brain hurts. Try again.";

/// =============================
/// Request Model
/// =============================

/// The subset of Twilio's webhook fields the assistant looks at
#[derive(Debug, Default, Deserialize)]
pub struct InboundMessage {
    /// Present only on delivery status callbacks
    #[serde(rename = "MessageStatus")]
    pub message_status: Option<String>,
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<ConversationOrchestrator>,
}

/// =============================
/// TwiML
/// =============================

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a reply in a single-message TwiML document
pub fn twiml_message(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(body)
    )
}

fn twiml_response(body: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        twiml_message(body),
    )
        .into_response()
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// WhatsApp Endpoint
/// =============================

async fn whatsapp_reply(
    State(state): State<ApiState>,
    Form(msg): Form<InboundMessage>,
) -> Response {
    // Delivery receipts (sent/delivered/read) must not trigger a reply
    if msg.message_status.is_some() {
        return (StatusCode::OK, "Status Ignored").into_response();
    }

    let text = msg.body.trim().to_string();
    if text.is_empty() {
        info!(from = %msg.from, "Skipping empty message");
        return (StatusCode::OK, "No Content").into_response();
    }

    info!(from = %msg.from, message = %text, "WhatsApp message received");

    // A panicking cycle must still produce a reply to the provider
    let orchestrator = Arc::clone(&state.orchestrator);
    let cycle = tokio::spawn(async move { orchestrator.run_cycle(&text).await });

    match cycle.await {
        Ok(reply) => twiml_response(&reply),
        Err(e) => {
            error!("Reply cycle aborted: {}", e);
            twiml_response(FALLBACK_REPLY)
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<ConversationOrchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/health", get(health))
        .route("/whatsapp", post(whatsapp_reply))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<ConversationOrchestrator>,
    port: u16,
) -> crate::Result<()> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Webhook server listening on http://0.0.0.0:{}", port);
    info!("Twilio webhook: POST http://127.0.0.1:{}/whatsapp", port);

    axum::serve(listener, router).await?;

    Ok(())
}
