use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body sent to the client whenever the engine cannot produce audio.
pub const SYNTHESIS_FAILED_BODY: &str = "Could not Synthesize Speech";

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to add voice {name}: {reason}")]
    VoiceRegistration { name: String, reason: String },

    #[error("Could not synthesize with voice '{voice}': {reason}")]
    Synthesis { voice: String, reason: String },

    #[error("Failed to render page: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("Could not write waveform: {0}")]
    Write(String),

    #[error("Speech engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Registration,
    Synthesis,
    Render,
    Write,
    Engine,
    Wav,
    Io,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::VoiceRegistration { .. } => ErrorKind::Registration,
            AppError::Synthesis { .. } => ErrorKind::Synthesis,
            AppError::Render(_) => ErrorKind::Render,
            AppError::Write(_) => ErrorKind::Write,
            AppError::EngineUnavailable(_) => ErrorKind::Engine,
            AppError::Wav(_) => ErrorKind::Wav,
            AppError::Io(_) => ErrorKind::Io,
        }
    }

    fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Registration => "VOICE_REGISTRATION_ERROR",
            ErrorKind::Synthesis => "SYNTHESIS_ERROR",
            ErrorKind::Render => "RENDER_ERROR",
            ErrorKind::Write => "WRITE_ERROR",
            ErrorKind::Engine => "ENGINE_ERROR",
            ErrorKind::Wav => "WAV_ERROR",
            ErrorKind::Io => "IO_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        // The browser's <audio> element only needs a status; keep the body fixed.
        // The handler already logged the voice and text of the failed request.
        if let AppError::Synthesis { .. } = self {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                SYNTHESIS_FAILED_BODY,
            )
                .into_response();
        }

        tracing::error!("Request failed: {} - {}", code, self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
