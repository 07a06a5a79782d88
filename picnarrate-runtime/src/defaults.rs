use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "picnarrate";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const AUDIO_CACHE_FILE_NAME: &str = "audio_cache.json";
pub const WAVEFORM_DIR_NAME: &str = "waveforms";

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    app_dir(dirs::config_dir()).join(CONFIG_FILE_NAME)
}

pub fn default_audio_cache_path() -> PathBuf {
    app_dir(dirs::data_dir()).join(AUDIO_CACHE_FILE_NAME)
}

/// Downloaded waveform images live here while they are displayed.
pub fn default_waveform_dir() -> PathBuf {
    app_dir(dirs::cache_dir()).join(WAVEFORM_DIR_NAME)
}
