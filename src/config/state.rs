// Application state module
// Holds the configuration and the audio library shared by all connections

use super::types::Config;
use crate::library::AudioLibrary;

/// Application state
pub struct AppState {
    pub config: Config,
    pub library: AudioLibrary,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let library = AudioLibrary::new(config.library.audio_dir.clone());
        Self { config, library }
    }
}
