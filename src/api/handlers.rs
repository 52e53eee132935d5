use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Query, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

use super::{page, HealthResponse, VoicesResponse, WavParams};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::tts::{engine_voice, DEFAULT_VOICE};

const WAV_CONTENT_TYPE: &str = "audio/x-wav";
const CHUNK_SIZE: usize = 16 * 1024;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = page::render_index(&state.voices)?;
    Ok(Html(page))
}

pub async fn wav(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    Query(query): Query<Vec<(String, String)>>,
    form: Option<Form<Vec<(String, String)>>>,
) -> Result<Response, AppError> {
    let form = form.map(|Form(pairs)| pairs).unwrap_or_default();
    let WavParams { text, voice } = WavParams::from_pairs(&form, &query);
    tracing::info!("wavegen: {}\t{}\t{}", peer.ip(), voice, text);

    let voice = engine_voice(&voice).to_string();
    let engine = Arc::clone(&state.engine);
    let (job_text, job_voice) = (text.clone(), voice.clone());
    let result = tokio::task::spawn_blocking(move || engine.text_to_wave(&job_text, &job_voice))
        .await
        .unwrap_or_else(|e| {
            Err(AppError::Synthesis {
                voice: voice.clone(),
                reason: format!("synthesis task failed: {}", e),
            })
        });

    let wave = match result {
        Ok(wave) => wave,
        Err(e) => {
            tracing::error!("Could not synthesize voice {:?}: {}: {}", voice, text, e);
            return Err(e);
        }
    };

    tracing::debug!("Synthesized {:.2}s of audio", wave.duration_secs());
    let data = Bytes::from(wave.to_riff_bytes()?);
    let headers = [
        (header::CONTENT_TYPE, WAV_CONTENT_TYPE.to_string()),
        (header::CONTENT_LENGTH, data.len().to_string()),
    ];

    // HEAD never reads the body, so there is nothing to stream
    if method == Method::HEAD {
        return Ok((StatusCode::OK, headers, Body::empty()).into_response());
    }

    let (body, _writer) = stream_body(data);
    Ok((StatusCode::OK, headers, body).into_response())
}

/// Stream `data` to the client in chunks.
///
/// The writer task stops as soon as the client goes away; bytes already sent
/// stay sent. One chunk is buffered at a time, so a waveform that fits in two
/// chunks can be handed off entirely before a disconnect is noticed.
fn stream_body(data: Bytes) -> (Body, JoinHandle<Result<(), AppError>>) {
    let (tx, rx) = mpsc::channel::<Result<Bytes, std::io::Error>>(1);

    let writer = tokio::spawn(async move {
        let mut offset = 0;
        while offset < data.len() {
            let end = (offset + CHUNK_SIZE).min(data.len());
            if tx.send(Ok(data.slice(offset..end))).await.is_err() {
                let err = AppError::Write(format!(
                    "client disconnected after {} of {} bytes",
                    offset,
                    data.len()
                ));
                tracing::warn!("{}", err);
                return Err(err);
            }
            offset = end;
        }
        Ok(())
    });

    (Body::from_stream(ReceiverStream::new(rx)), writer)
}

pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.voices.clone(),
        default: DEFAULT_VOICE.to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
