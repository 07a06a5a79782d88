use async_trait::async_trait;
use picnarrate_core::config::ClientConfig;
use picnarrate_core::error::ClientError;
use picnarrate_core::media::{ImageFile, WaveformImage};
use picnarrate_core::types::{UploadOptions, UploadResult};
use picnarrate_engine::traits::{DescribeService, ProgressFn};
use picnarrate_providers::endpoints::{
    Endpoints, build_list_recordings_request, build_output_path_request, build_waveform_request,
};
use picnarrate_providers::parse::{
    parse_output_path, parse_recordings_listing, parse_upload_response,
};
use picnarrate_providers::runtime::{BytesProgress, HttpClient, HttpResponse, percent};
use picnarrate_providers::upload::build_upload_request;
use std::sync::Arc;
use std::time::Duration;

pub const UPLOAD_FAILED: &str = "An error occurred while uploading. Please try again.";

/// [`DescribeService`] backed by the HTTP describe/synthesize service.
#[derive(Debug, Clone)]
pub struct HttpDescribeService {
    endpoints: Endpoints,
    http: HttpClient,
}

impl HttpDescribeService {
    pub fn new(endpoints: Endpoints, http: HttpClient) -> Self {
        Self { endpoints, http }
    }

    pub fn from_config(cfg: &ClientConfig) -> anyhow::Result<Self> {
        let http = HttpClient::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.request_timeout_secs),
        )?;
        Ok(Self::new(Endpoints::from_config(cfg), http))
    }
}

fn transport_failure(what: &str, resp: &HttpResponse) -> ClientError {
    ClientError::Transport(format!("Failed to fetch {what}: {}", resp.status_text()))
}

#[async_trait]
impl DescribeService for HttpDescribeService {
    async fn upload(
        &self,
        file: &ImageFile,
        options: &UploadOptions,
        on_progress: ProgressFn,
    ) -> Result<UploadResult, ClientError> {
        let req = build_upload_request(&self.endpoints, file, options);
        log::debug!("upload request: {req:?}");

        let bytes_progress: BytesProgress =
            Arc::new(move |sent, total| on_progress(percent(sent, total)));

        let resp = match self.http.execute_with_progress(&req, bytes_progress).await {
            Ok(r) => r,
            Err(e) => {
                log::error!("upload failed: {e:#}");
                return Err(ClientError::Transport(UPLOAD_FAILED.into()));
            }
        };

        if !resp.is_success() {
            log::error!("upload rejected: status={}", resp.status);
            return Err(ClientError::Transport(UPLOAD_FAILED.into()));
        }

        parse_upload_response(&resp.body).map_err(|e| {
            log::warn!("upload response not understood: {e:#}");
            ClientError::MalformedResponse(e.to_string())
        })
    }

    async fn list_recordings(&self) -> Result<Vec<String>, ClientError> {
        let req = build_list_recordings_request(&self.endpoints);
        let resp = self.http.execute(&req).await.map_err(|e| {
            log::warn!("list recordings failed: {e:#}");
            ClientError::Transport(format!("Failed to fetch recordings: {e}"))
        })?;

        if !resp.is_success() {
            log::warn!("list recordings: status={}", resp.status);
            return Err(transport_failure("recordings", &resp));
        }

        parse_recordings_listing(&resp.body).map_err(|e| {
            log::warn!("recordings listing not understood: {e:#}");
            ClientError::MalformedResponse(e.to_string())
        })
    }

    async fn fetch_waveform(&self) -> Result<WaveformImage, ClientError> {
        let req = build_waveform_request(&self.endpoints);
        let resp = self.http.execute(&req).await.map_err(|e| {
            log::warn!("fetch waveform failed: {e:#}");
            ClientError::Transport(format!("Failed to fetch waveform: {e}"))
        })?;

        if !resp.is_success() {
            log::warn!("fetch waveform: status={}", resp.status);
            return Err(transport_failure("waveform", &resp));
        }
        if resp.body.is_empty() {
            return Err(ClientError::MalformedResponse("empty waveform body".into()));
        }

        Ok(WaveformImage {
            bytes: resp.body,
            content_type: resp.content_type,
        })
    }

    async fn fetch_output_path(&self) -> Result<String, ClientError> {
        let req = build_output_path_request(&self.endpoints);
        let resp = self.http.execute(&req).await.map_err(|e| {
            log::warn!("fetch output path failed: {e:#}");
            ClientError::Transport(format!("Failed to fetch audio: {e}"))
        })?;

        if !resp.is_success() {
            log::warn!("fetch output path: status={}", resp.status);
            return Err(transport_failure("audio", &resp));
        }

        parse_output_path(&resp.body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picnarrate_core::types::{DescriptionMode, Language, Speaker};
    use std::sync::Mutex;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> HttpDescribeService {
        let cfg = ClientConfig {
            base_url: server.uri(),
            connect_timeout_secs: 5,
            request_timeout_secs: 5,
            ..Default::default()
        };
        HttpDescribeService::from_config(&cfg).unwrap()
    }

    fn png() -> ImageFile {
        ImageFile::from_bytes("cat.png", b"PNG-pixels".to_vec())
    }

    fn ignore_progress() -> ProgressFn {
        Arc::new(|_| {})
    }

    #[tokio::test]
    async fn upload_sends_choices_and_parses_nested_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload-image/"))
            .and(body_string_contains("name=\"description_mode\"\r\n\r\ndetailed"))
            .and(body_string_contains("Gracie Wise"))
            .and(body_string_contains("UK English"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "process_response": { "description": "A cat on a mat." },
                "audio_response": { "audio_paths": { "mp3": "out/cat.mp3" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = UploadOptions {
            mode: DescriptionMode::Detailed,
            speaker: Some(Speaker::GracieWise),
            language: Some(Language::UkEnglish),
        };
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let result = service(&server)
            .upload(&png(), &options, Arc::new(move |p: u8| sink.lock().unwrap().push(p)))
            .await
            .unwrap();

        assert_eq!(result.description, "A cat on a mat.");
        assert_eq!(result.audio, "out/cat.mp3");
        assert_eq!(seen.lock().unwrap().last(), Some(&100));
    }

    #[tokio::test]
    async fn upload_rejection_is_a_generic_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = service(&server)
            .upload(&png(), &UploadOptions::default(), ignore_progress())
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Transport(UPLOAD_FAILED.into()));
    }

    #[tokio::test]
    async fn upload_with_non_object_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1,2]"))
            .mount(&server)
            .await;

        let err = service(&server)
            .upload(&png(), &UploadOptions::default(), ignore_progress())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert_eq!(err.user_message(), "Unexpected response structure.");
    }

    #[tokio::test]
    async fn recordings_listing_and_status_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/first-six-recordings"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["b.mp3", "a.mp3"])),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/first-six-recordings"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let svc = service(&server);
        assert_eq!(svc.list_recordings().await.unwrap(), vec!["b.mp3", "a.mp3"]);

        let err = svc.list_recordings().await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Failed to fetch recordings: 503 Service Unavailable"
        );
    }

    #[tokio::test]
    async fn waveform_keeps_content_type_and_rejects_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-waveform"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![7u8; 8], "image/jpeg"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/get-waveform"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let svc = service(&server);
        let img = svc.fetch_waveform().await.unwrap();
        assert_eq!(img.bytes.len(), 8);
        assert_eq!(img.content_type.as_deref(), Some("image/jpeg"));

        assert!(matches!(
            svc.fetch_waveform().await,
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn output_path_is_read_from_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/output_path"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "audio_path": "out/last.mp3" })),
            )
            .mount(&server)
            .await;

        assert_eq!(
            service(&server).fetch_output_path().await.unwrap(),
            "out/last.mp3"
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_transport() {
        let cfg = ClientConfig {
            base_url: "http://127.0.0.1:9".into(),
            connect_timeout_secs: 2,
            request_timeout_secs: 2,
            ..Default::default()
        };
        let svc = HttpDescribeService::from_config(&cfg).unwrap();
        assert!(matches!(
            svc.list_recordings().await,
            Err(ClientError::Transport(_))
        ));
    }
}
