//! Weather Assistant HTTP Server
//!
//! Axum-based server exposing the weather chat agent over REST and
//! WebSocket. Each session keeps its own conversation history.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, ChatHandler, LlmProvider, MemorySessionStore};
use agent_runtime::{OpenAiConfig, OpenAiProvider};
use weather_advisor::{weather_tools, ProviderKeys, WEATHER_ASSISTANT_PROMPT, WELCOME_MESSAGE};

use crate::config::ServerConfig;
use crate::handlers::{
    chat_ws_handler, create_session, delete_session, get_history, health_check, post_message,
};
use crate::state::AppState;

pub(crate) fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", axum::routing::delete(delete_session))
        .route("/api/sessions/{id}/messages", post(post_message))
        .route("/api/sessions/{id}/history", get(get_history))
        // Streaming chat
        .route("/api/chat/ws", get(chat_ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let server = ServerConfig::from_env()?;
    let keys = ProviderKeys::from_env().context("Missing weather provider credentials")?;
    let llm = OpenAiConfig::from_env().context("Missing model credentials")?;
    let model = llm.model.clone();

    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::from_config(llm));
    match provider.health_check().await {
        Ok(true) => tracing::info!(model = %model, "✓ Connected to model endpoint"),
        Ok(false) | Err(_) => {
            tracing::warn!(model = %model, "⚠ Model endpoint not reachable - chats will fail");
        }
    }

    let tools = weather_tools(&keys);
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let agent = AgentBuilder::new()
        .provider(provider.clone())
        .tools(tools)
        .system_prompt(WEATHER_ASSISTANT_PROMPT)
        .model(model)
        .build()?;

    let store = Arc::new(MemorySessionStore::with_retention(server.retention));
    let chat = ChatHandler::new(Arc::new(agent), store).with_welcome(WELCOME_MESSAGE);

    let state = AppState {
        chat: Arc::new(chat),
        provider,
    };

    let listener = tokio::net::TcpListener::bind(&server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", server.bind_addr))?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🌦 weather assistant running on http://{}", server.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health                     - Health check");
    tracing::info!("  POST   /api/sessions               - Start a chat");
    tracing::info!("  POST   /api/sessions/{{id}}/messages - Send message");
    tracing::info!("  GET    /api/sessions/{{id}}/history  - Session history");
    tracing::info!("  DELETE /api/sessions/{{id}}          - End a chat");
    tracing::info!("  GET    /api/chat/ws                - WebSocket chat");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
