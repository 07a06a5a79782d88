use crate::types::{ThemeMode, UploadOptions};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_UPLOAD_PATH: &str = "/upload-image/";
pub const DEFAULT_RECORDINGS_PATH: &str = "/first-six-recordings";
pub const LATEST_RECORDINGS_PATH: &str = "/latest-recordings";
pub const DEFAULT_WAVEFORM_PATH: &str = "/get-waveform";
pub const DEFAULT_OUTPUT_PATH: &str = "/output_path";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub upload_path: String,
    pub recordings_path: String,
    pub waveform_path: String,
    pub output_path: String,

    pub connect_timeout_secs: u64,
    // Description + synthesis happen inside the upload call, so this is generous.
    pub request_timeout_secs: u64,

    pub defaults: UploadOptions,
    pub theme: ThemeMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            upload_path: DEFAULT_UPLOAD_PATH.into(),
            recordings_path: DEFAULT_RECORDINGS_PATH.into(),
            waveform_path: DEFAULT_WAVEFORM_PATH.into(),
            output_path: DEFAULT_OUTPUT_PATH.into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            defaults: UploadOptions::default(),
            theme: ThemeMode::default(),
        }
    }
}
