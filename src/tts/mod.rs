pub mod flite;
pub mod registry;
pub mod wave;

use std::path::Path;

use crate::error::AppError;

pub use flite::{FliteConfig, FliteEngine};
pub use registry::register_voices;
pub use wave::Waveform;

/// Voice name the page offers for the engine's built-in voice.
pub const DEFAULT_VOICE: &str = "Default";

/// A speech synthesizer that can load extra voices and render text.
///
/// Implementations must be callable from several request handlers at once;
/// engines that are not reentrant serialize internally.
pub trait SpeechEngine: Send + Sync {
    /// Load the voice package at `path` and make it available as `name`.
    fn add_voice(&self, name: &str, path: &Path) -> Result<(), AppError>;

    /// Synthesize `text`. An empty `voice` selects the engine default.
    fn text_to_wave(&self, text: &str, voice: &str) -> Result<Waveform, AppError>;
}

/// Map the page's sentinel voice to the engine's "use the default" value.
pub fn engine_voice(requested: &str) -> &str {
    if requested == DEFAULT_VOICE {
        ""
    } else {
        requested
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::{SpeechEngine, Waveform};
    use crate::error::AppError;

    /// In-memory engine. Voice files whose contents start with `broken`
    /// fail to load; synthesis knows the default voice plus loaded ones.
    #[derive(Default)]
    pub struct FakeEngine {
        voices: Mutex<HashSet<String>>,
        added: Mutex<Vec<(String, PathBuf)>>,
        calls: Mutex<Vec<(String, String)>>,
        fail_synthesis: bool,
    }

    impl FakeEngine {
        pub fn failing() -> Self {
            Self {
                fail_synthesis: true,
                ..Self::default()
            }
        }

        pub fn added(&self) -> Vec<String> {
            self.added
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }

        pub fn paths(&self) -> Vec<PathBuf> {
            self.added
                .lock()
                .unwrap()
                .iter()
                .map(|(_, path)| path.clone())
                .collect()
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SpeechEngine for FakeEngine {
        fn add_voice(&self, name: &str, path: &Path) -> Result<(), AppError> {
            self.added
                .lock()
                .unwrap()
                .push((name.to_string(), path.to_path_buf()));

            let contents = std::fs::read_to_string(path)?;
            if contents.starts_with("broken") {
                return Err(AppError::VoiceRegistration {
                    name: name.to_string(),
                    reason: "not a voice package".into(),
                });
            }

            self.voices.lock().unwrap().insert(name.to_string());
            Ok(())
        }

        fn text_to_wave(&self, text: &str, voice: &str) -> Result<Waveform, AppError> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), voice.to_string()));

            let known = voice.is_empty() || self.voices.lock().unwrap().contains(voice);
            if self.fail_synthesis || !known {
                return Err(AppError::Synthesis {
                    voice: voice.to_string(),
                    reason: "unknown voice".into(),
                });
            }

            let samples = text.bytes().map(|b| i16::from(b) * 64).collect();
            Ok(Waveform::new(16000, 1, samples))
        }
    }
}
