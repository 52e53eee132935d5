use std::path::Path;

use super::SpeechEngine;

/// File name suffix of loadable Flite voice packages.
pub const VOICE_SUFFIX: &str = ".flitevox";

/// Register every `*.flitevox` file in `voxpath` with the engine.
///
/// Returns the names that registered successfully, in directory listing
/// order. A voice that fails to load is logged and skipped; a missing or
/// unreadable directory yields an empty list.
pub fn register_voices(engine: &dyn SpeechEngine, voxpath: Option<&Path>) -> Vec<String> {
    let mut voices = Vec::new();

    let Some(dir) = voxpath else {
        return voices;
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot read voice directory {}: {}", dir.display(), e);
            return voices;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.ends_with(VOICE_SUFFIX) {
            continue;
        }

        match engine.add_voice(&name, &dir.join(&name)) {
            Ok(()) => {
                tracing::info!("Added voice {}", name);
                voices.push(name);
            }
            Err(e) => tracing::warn!("Failed to add voice {}: {}", name, e),
        }
    }

    voices
}
