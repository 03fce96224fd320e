//! Heartline server entrypoint.
//!
//! Wires configuration, adapters, and the axum router, then serves until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heartline::adapters::exemplars::InMemoryExemplarIndex;
use heartline::adapters::http::{routes, AppState};
use heartline::adapters::llm::{OpenAiCompatConfig, OpenAiCompatProvider};
use heartline::adapters::store::{InMemoryConversationStore, InMemoryMemoryStore};
use heartline::application::handlers::TurnConfig;
use heartline::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.clone().into());
    // Line-per-event JSON in production for log aggregation, human-readable
    // output everywhere else.
    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Heartline check-in service");

    let api_key = config
        .ai
        .api_key
        .as_ref()
        .ok_or("HEARTLINE__AI__API_KEY is required")?;
    let llm_config = OpenAiCompatConfig::new(api_key.expose_secret().as_str())
        .with_model(config.ai.model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout());
    let llm = Arc::new(OpenAiCompatProvider::new(llm_config));
    tracing::info!(model = %config.ai.model, "Language model provider ready");

    let state = AppState::new(
        Arc::new(InMemoryConversationStore::new()),
        Arc::new(InMemoryMemoryStore::new()),
        llm,
        Arc::new(InMemoryExemplarIndex::seeded()),
        TurnConfig {
            classify_timeout: config.ai.classify_timeout(),
            retry_temperature: config.ai.retry_temperature,
            enforce_gate: config.gate.enforce,
        },
    );

    let cors = {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        if origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let app = routes()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors)
        .with_state(state);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Heartline listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
