//! Flite bindings, resolved at runtime from the system's shared libraries.
//!
//! Flite keeps global state (language tables, lexicons, the voice list) and
//! does not document any thread-safety guarantees, so every call into it goes
//! through one mutex.

use std::collections::HashMap;
use std::ffi::{c_char, c_int, CString};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use libloading::Library;

use super::{SpeechEngine, Waveform};
use crate::error::AppError;

#[repr(C)]
struct CstVoice {
    _private: [u8; 0],
}

#[repr(C)]
struct CstLexicon {
    _private: [u8; 0],
}

/// Mirror of flite's `cst_wave`.
#[repr(C)]
struct CstWave {
    #[allow(dead_code)]
    kind: *const c_char,
    sample_rate: c_int,
    num_samples: c_int,
    num_channels: c_int,
    samples: *mut i16,
}

type LangInitFn = unsafe extern "C" fn(*mut CstVoice);
type LexInitFn = unsafe extern "C" fn() -> *mut CstLexicon;
type FliteInitFn = unsafe extern "C" fn() -> c_int;
type AddLangFn = unsafe extern "C" fn(*const c_char, LangInitFn, LexInitFn) -> c_int;
type VoiceLoadFn = unsafe extern "C" fn(*const c_char) -> *mut CstVoice;
type TextToWaveFn = unsafe extern "C" fn(*const c_char, *mut CstVoice) -> *mut CstWave;
type DeleteWaveFn = unsafe extern "C" fn(*mut CstWave);
type RegisterVoiceFn = unsafe extern "C" fn(*const c_char) -> *mut CstVoice;

/// Languages `.flitevox` files may declare.
const LANGUAGES: [&str; 2] = ["eng", "usenglish"];

#[derive(Debug, Clone)]
pub struct FliteConfig {
    /// Directory holding the flite shared libraries; `None` uses the loader's
    /// search path.
    pub lib_dir: Option<PathBuf>,
    /// Compiled-in voice used when a request names no voice, e.g. `cmu_us_kal`.
    pub default_voice: String,
}

impl Default for FliteConfig {
    fn default() -> Self {
        Self {
            lib_dir: None,
            default_voice: "cmu_us_kal".to_string(),
        }
    }
}

impl FliteConfig {
    fn library_path(&self, stem: &str) -> PathBuf {
        let file = library_file(stem);
        match &self.lib_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

/// Platform file name of a flite library, e.g. `libflite.so.1` on Linux.
fn library_file(stem: &str) -> String {
    if cfg!(target_os = "macos") {
        format!("lib{}.dylib", stem)
    } else if cfg!(target_os = "windows") {
        format!("{}.dll", stem)
    } else {
        format!("lib{}.so.1", stem)
    }
}

struct FliteApi {
    voice_load: VoiceLoadFn,
    text_to_wave: TextToWaveFn,
    delete_wave: DeleteWaveFn,
    // Keeps the function pointers above valid; dropped last.
    _libraries: Vec<Library>,
}

struct FliteState {
    api: FliteApi,
    default_voice: *mut CstVoice,
    voices: HashMap<String, *mut CstVoice>,
}

// The voice pointers are only dereferenced by flite while the mutex is held.
unsafe impl Send for FliteState {}

pub struct FliteEngine {
    state: Mutex<FliteState>,
}

impl FliteEngine {
    /// Load flite, register the English language support and the default voice.
    pub fn load(config: &FliteConfig) -> Result<Self, AppError> {
        let flite = open_library(&config.library_path("flite"))?;
        let usenglish = open_library(&config.library_path("flite_usenglish"))?;
        let cmulex = open_library(&config.library_path("flite_cmulex"))?;
        let voice_lib =
            open_library(&config.library_path(&format!("flite_{}", config.default_voice)))?;

        let init: FliteInitFn = symbol(&flite, "flite_init")?;
        let add_lang: AddLangFn = symbol(&flite, "flite_add_lang")?;
        let lang_init: LangInitFn = symbol(&usenglish, "usenglish_init")?;
        let lex_init: LexInitFn = symbol(&cmulex, "cmulex_init")?;
        let register: RegisterVoiceFn =
            symbol(&voice_lib, &format!("register_{}", config.default_voice))?;

        let api = FliteApi {
            voice_load: symbol(&flite, "flite_voice_load")?,
            text_to_wave: symbol(&flite, "flite_text_to_wave")?,
            delete_wave: symbol(&flite, "delete_wave")?,
            _libraries: vec![flite, usenglish, cmulex, voice_lib],
        };

        // SAFETY: the symbols come from the libraries held in `api` and match
        // the C prototypes declared above.
        let default_voice = unsafe {
            init();
            for lang in LANGUAGES {
                let name = CString::new(lang).map_err(|e| {
                    AppError::EngineUnavailable(format!("bad language name: {}", e))
                })?;
                add_lang(name.as_ptr(), lang_init, lex_init);
            }
            register(std::ptr::null())
        };

        if default_voice.is_null() {
            return Err(AppError::EngineUnavailable(format!(
                "register_{} returned no voice",
                config.default_voice
            )));
        }

        tracing::info!("Flite loaded with default voice {}", config.default_voice);

        Ok(Self {
            state: Mutex::new(FliteState {
                api,
                default_voice,
                voices: HashMap::new(),
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, FliteState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::EngineUnavailable("flite state lock poisoned".into()))
    }
}

impl SpeechEngine for FliteEngine {
    fn add_voice(&self, name: &str, path: &Path) -> Result<(), AppError> {
        let failed = |reason: &str| AppError::VoiceRegistration {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let path = path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| failed("path is not a valid C string"))?;

        let mut state = self.lock()?;
        // SAFETY: `path` is NUL-terminated and outlives the call.
        let voice = unsafe { (state.api.voice_load)(path.as_ptr()) };
        if voice.is_null() {
            return Err(failed("flite_voice_load returned NULL"));
        }

        // Voices stay loaded for the life of the process.
        state.voices.insert(name.to_string(), voice);
        Ok(())
    }

    fn text_to_wave(&self, text: &str, voice: &str) -> Result<Waveform, AppError> {
        let failed = |reason: &str| AppError::Synthesis {
            voice: voice.to_string(),
            reason: reason.to_string(),
        };

        let text = CString::new(text).map_err(|_| failed("text contains a NUL byte"))?;

        let state = self.lock()?;
        let vox = if voice.is_empty() {
            state.default_voice
        } else {
            *state
                .voices
                .get(voice)
                .ok_or_else(|| failed("unknown voice"))?
        };

        // SAFETY: `vox` was returned by flite and is never freed; `text` is
        // NUL-terminated. The returned wave is owned by us until delete_wave.
        unsafe {
            let wave = (state.api.text_to_wave)(text.as_ptr(), vox);
            if wave.is_null() {
                return Err(failed("flite_text_to_wave returned NULL"));
            }
            let result = copy_wave(&*wave).map_err(|reason| failed(&reason));
            (state.api.delete_wave)(wave);
            result
        }
    }
}

fn open_library(path: &Path) -> Result<Library, AppError> {
    // SAFETY: flite's initialisers have no side effects beyond its own globals.
    unsafe { Library::new(path) }
        .map_err(|e| AppError::EngineUnavailable(format!("{}: {}", path.display(), e)))
}

fn symbol<T: Copy>(library: &Library, name: &str) -> Result<T, AppError> {
    // SAFETY: callers pick `T` to match the C prototype of `name`.
    let sym = unsafe { library.get::<T>(name.as_bytes()) }
        .map_err(|e| AppError::EngineUnavailable(format!("missing symbol {}: {}", name, e)))?;
    Ok(*sym)
}

/// Copy the samples out of a flite wave so it can be freed immediately.
///
/// # Safety
/// `wave.samples` must point to `num_samples * num_channels` shorts or be null.
unsafe fn copy_wave(wave: &CstWave) -> Result<Waveform, String> {
    let sample_rate = u32::try_from(wave.sample_rate)
        .map_err(|_| format!("invalid sample rate {}", wave.sample_rate))?;
    let channels = u16::try_from(wave.num_channels)
        .map_err(|_| format!("invalid channel count {}", wave.num_channels))?;
    let frames = usize::try_from(wave.num_samples)
        .map_err(|_| format!("invalid sample count {}", wave.num_samples))?;

    let len = frames * channels as usize;
    let samples = if wave.samples.is_null() || len == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(wave.samples, len).to_vec()
    };

    Ok(Waveform::new(sample_rate, channels, samples))
}
