use crate::request::HttpRequest;
use picnarrate_core::config::ClientConfig;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub upload_path: String,
    pub recordings_path: String,
    pub waveform_path: String,
    pub output_path: String,
}

impl Endpoints {
    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            upload_path: cfg.upload_path.clone(),
            recordings_path: cfg.recordings_path.clone(),
            waveform_path: cfg.waveform_path.clone(),
            output_path: cfg.output_path.clone(),
        }
    }

    pub fn upload_url(&self) -> String {
        join_url(&self.base_url, &self.upload_path)
    }

    pub fn recordings_url(&self) -> String {
        join_url(&self.base_url, &self.recordings_path)
    }

    pub fn waveform_url(&self) -> String {
        join_url(&self.base_url, &self.waveform_path)
    }

    pub fn output_path_url(&self) -> String {
        join_url(&self.base_url, &self.output_path)
    }
}

pub fn build_list_recordings_request(endpoints: &Endpoints) -> HttpRequest {
    HttpRequest::get(endpoints.recordings_url(), "application/json")
}

pub fn build_waveform_request(endpoints: &Endpoints) -> HttpRequest {
    HttpRequest::get(endpoints.waveform_url(), "image/*")
}

pub fn build_output_path_request(endpoints: &Endpoints) -> HttpRequest {
    HttpRequest::get(endpoints.output_path_url(), "application/json")
}

/// Joins without collapsing a trailing slash on `path` (`/upload-image/` is significant).
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Turns an artifact reference from the service into something playable.
///
/// Absolute http(s) URLs pass through, relative paths are resolved against the base URL,
/// and an empty reference stays empty.
pub fn resolve_artifact_url(base: &str, reference: &str) -> String {
    let reference = reference.trim();
    if reference.is_empty() {
        return String::new();
    }

    if let Ok(u) = Url::parse(reference) {
        if matches!(u.scheme(), "http" | "https" | "file") {
            return u.to_string();
        }
    }

    let base = format!("{}/", base.trim_end_matches('/'));
    match Url::parse(&base).and_then(|b| b.join(reference.trim_start_matches('/'))) {
        Ok(u) => u.to_string(),
        Err(e) => {
            log::debug!("could not resolve artifact {reference:?} against {base:?}: {e}");
            join_url(&base, reference)
        }
    }
}
