use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use picnarrate_core::config::ClientConfig;
use picnarrate_core::error::ClientError;
use picnarrate_core::media::{UploadRequest, WaveformImage};
use picnarrate_core::types::{Recording, UploadResult};
use picnarrate_engine::orchestrator::{
    StateHook, SubmitOutcome, SuccessHook, UploadOrchestrator,
};
use picnarrate_engine::workflow::UploadWorkflowState;
use picnarrate_engine::recordings::RecordingsFeed;
use picnarrate_engine::traits::{AudioPathCache, DescribeService};
use picnarrate_engine::waveform::{LocalImage, WaveformFetcher, WaveformOutcome};
use picnarrate_providers::endpoints::resolve_artifact_url;
use picnarrate_providers::waveform::data_url;
use picnarrate_runtime::describe::HttpDescribeService;

/// Everything a front end needs: one orchestrator, one recordings feed, one waveform fetcher,
/// all sharing the same service and the persisted audio cache.
#[derive(Clone)]
pub struct AppService {
    config: ClientConfig,
    service: Arc<dyn DescribeService>,
    cache: Arc<dyn AudioPathCache>,
    orchestrator: UploadOrchestrator,
    recordings: RecordingsFeed,
}

impl AppService {
    pub fn new(
        config: ClientConfig,
        cache: Arc<dyn AudioPathCache>,
        waveform_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let service: Arc<dyn DescribeService> = Arc::new(
            HttpDescribeService::from_config(&config).context("build describe service")?,
        );
        Ok(Self::with_service(config, service, cache, waveform_dir))
    }

    pub fn with_service(
        config: ClientConfig,
        service: Arc<dyn DescribeService>,
        cache: Arc<dyn AudioPathCache>,
        waveform_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(dir) = &waveform_dir {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::warn!("create waveform dir {} failed: {e}", dir.display());
            }
        }

        let waveform = WaveformFetcher::new(service.clone(), waveform_dir);
        let on_success: SuccessHook = {
            let cache = cache.clone();
            let base_url = config.base_url.clone();
            Arc::new(move |result: &UploadResult| {
                if result.has_audio() {
                    remember(cache.as_ref(), &base_url, &result.audio);
                }
            })
        };
        let orchestrator =
            UploadOrchestrator::with_success_hook(service.clone(), waveform, on_success);
        let recordings = RecordingsFeed::new(service.clone());
        Self {
            config,
            service,
            cache,
            orchestrator,
            recordings,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &UploadOrchestrator {
        &self.orchestrator
    }

    pub fn recordings(&self) -> &RecordingsFeed {
        &self.recordings
    }

    pub fn waveform(&self) -> &WaveformFetcher {
        self.orchestrator.waveform()
    }

    pub async fn describe(&self, request: UploadRequest) -> SubmitOutcome {
        self.describe_with_hook(request, Arc::new(|_: &UploadWorkflowState| {})).await
    }

    /// Runs one submission. A successful result with audio becomes the cached "last output"
    /// at the moment it is published, so a superseded submission never overwrites it.
    pub async fn describe_with_hook(
        &self,
        request: UploadRequest,
        hook: StateHook,
    ) -> SubmitOutcome {
        self.orchestrator.submit_with_hook(request, hook).await
    }

    /// Asks the service for the most recent output and caches it.
    pub async fn recall_last_output(&self) -> Result<String, ClientError> {
        let reference = self.service.fetch_output_path().await?;
        if reference.trim().is_empty() {
            return Ok(String::new());
        }
        remember(self.cache.as_ref(), &self.config.base_url, &reference);
        Ok(self.artifact_url(&reference))
    }

    pub async fn load_recordings(&self) -> Result<Vec<Recording>, ClientError> {
        self.recordings.load().await
    }

    pub fn restore_cached_recordings(&self) -> Vec<Recording> {
        self.recordings.restore_cached(self.cache.as_ref())
    }

    /// Fetches the waveform for whatever result is current (the service only keeps the latest).
    pub async fn fetch_waveform(&self) -> WaveformOutcome {
        self.waveform().fetch_for_current_result().await
    }

    pub fn artifact_url(&self, reference: &str) -> String {
        resolve_artifact_url(&self.config.base_url, reference)
    }
}

// The cache stores playable URLs so an offline restore needs no base URL.
fn remember(cache: &dyn AudioPathCache, base_url: &str, reference: &str) {
    let url = resolve_artifact_url(base_url, reference);
    if let Err(e) = cache.set(&url) {
        log::warn!("cache last audio path failed: {e:#}");
    }
}

/// Inline `data:` URL for a downloaded waveform.
pub fn waveform_data_url(image: &LocalImage) -> anyhow::Result<String> {
    let bytes = std::fs::read(image.path())
        .with_context(|| format!("read waveform: {}", image.path().display()))?;
    Ok(data_url(&WaveformImage {
        bytes,
        content_type: image.content_type().map(str::to_string),
    }))
}
