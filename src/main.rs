//! Zana - property-process chat assistant
//!
//! Routes free-text chat messages into guided multi-step flows (property
//! registration, land verification, title deed search, lookups, song
//! requests) or into stateless small talk and utility replies.

mod api;
mod config;
mod dispatcher;
mod engine;
mod flow;
mod responder;
mod session;

use api::{create_router, AppState};
use config::AppConfig;
use dispatcher::Dispatcher;
use engine::FlowEngine;
use flow::FlowCatalog;
use responder::{CombinedLookup, ProfileStore, SmallTalkResponder};
use session::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zana=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env()?;

    let profiles = Arc::new(ProfileStore::new(&config.profile_path));
    tracing::info!(path = %profiles.path().display(), "Using profile file");

    let lookup = Arc::new(CombinedLookup::standard(
        &config.web_search_url,
        &config.wikipedia_url,
        config.lookup_timeout,
    )?);
    let fallback = Arc::new(SmallTalkResponder::new(profiles.clone(), lookup.clone()));

    let dispatcher = Dispatcher::new(
        FlowEngine::new(FlowCatalog::standard()),
        Arc::new(SessionStore::new()),
        lookup,
        fallback,
        profiles,
    );
    let state = AppState::new(dispatcher, &config.session_cookie);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    let addr = SocketAddr::new(config.bind, config.port);
    tracing::info!("Zana listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
