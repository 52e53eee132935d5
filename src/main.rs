use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use error::AppError;
use tts::{register_voices, FliteEngine, SpeechEngine};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    tracing::info!("Flite TTS Server v{}", env!("CARGO_PKG_VERSION"));

    let engine: Arc<dyn SpeechEngine> = Arc::new(FliteEngine::load(&config.flite())?);

    // Voices are registered before the listener exists and frozen afterwards
    let voices = register_voices(engine.as_ref(), config.voxpath.as_deref());
    tracing::info!("{} extra voice(s) available", voices.len());

    let state = Arc::new(AppState { engine, voices });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr.as_str()).await?;
    tracing::info!("Starting server on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
