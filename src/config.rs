use std::path::PathBuf;

use clap::Parser;

use crate::tts::FliteConfig;

/// Flite speech synthesis demo on the web
#[derive(Parser, Debug, Clone)]
#[command(name = "flite-tts-server")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address to listen on (host:port)
    #[arg(long, env = "FLITE_ADDR", default_value = "localhost:8080")]
    pub addr: String,

    /// Absolute path to a directory of *.flitevox voice files
    #[arg(long, env = "FLITE_VOXPATH", value_name = "DIR")]
    pub voxpath: Option<PathBuf>,

    /// Directory containing the flite shared libraries
    #[arg(long, env = "FLITE_LIB_DIR", value_name = "DIR")]
    pub flite_lib_dir: Option<PathBuf>,

    /// Compiled-in voice used for the "Default" choice
    #[arg(long, env = "FLITE_DEFAULT_VOICE", default_value = "cmu_us_kal")]
    pub default_voice: String,
}

impl Config {
    pub fn flite(&self) -> FliteConfig {
        FliteConfig {
            lib_dir: self.flite_lib_dir.clone(),
            default_voice: self.default_voice.clone(),
        }
    }
}
