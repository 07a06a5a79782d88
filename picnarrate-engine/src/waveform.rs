use crate::traits::DescribeService;
use anyhow::Context;
use picnarrate_core::error::ClientError;
use picnarrate_core::media::WaveformImage;
use picnarrate_providers::waveform::extension_for;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;
use tokio::sync::watch;

/// A waveform payload written to a local file so it can be opened by path.
///
/// The file is deleted when the last handle is dropped.
#[derive(Debug)]
pub struct LocalImage {
    path: TempPath,
    content_type: Option<String>,
    len: usize,
}

impl LocalImage {
    pub fn write(dir: Option<&Path>, image: &WaveformImage) -> anyhow::Result<Self> {
        let suffix = format!(".{}", extension_for(image.content_type.as_deref()));
        let mut builder = tempfile::Builder::new();
        builder.prefix("waveform-").suffix(&suffix);

        let mut file = match dir {
            Some(dir) => builder
                .tempfile_in(dir)
                .with_context(|| format!("create waveform file in {}", dir.display()))?,
            None => builder.tempfile().context("create waveform file")?,
        };
        file.write_all(&image.bytes)
            .context("write waveform file")?;
        file.flush().context("flush waveform file")?;

        Ok(Self {
            path: file.into_temp_path(),
            content_type: image.content_type.clone(),
            len: image.bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaveformState {
    /// Generation of the upload this waveform belongs to.
    pub token: u64,
    pub loading: bool,
    pub image: Option<Arc<LocalImage>>,
    pub error: Option<ClientError>,
}

#[derive(Debug, Clone)]
pub enum WaveformOutcome {
    Ready(Arc<LocalImage>),
    Failed(ClientError),
    /// A newer upload took over before the fetch finished; nothing was published.
    Stale,
}

struct Inner {
    service: Arc<dyn DescribeService>,
    dir: Option<PathBuf>,
    state: watch::Sender<WaveformState>,
}

#[derive(Clone)]
pub struct WaveformFetcher {
    inner: Arc<Inner>,
}

impl WaveformFetcher {
    pub fn new(service: Arc<dyn DescribeService>, dir: Option<PathBuf>) -> Self {
        let (state, _) = watch::channel(WaveformState::default());
        Self {
            inner: Arc::new(Inner {
                service,
                dir,
                state,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WaveformState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> WaveformState {
        self.inner.state.borrow().clone()
    }

    /// Marks `token` as the current upload. Fetches started for older tokens become stale.
    pub fn begin(&self, token: u64) {
        self.inner.state.send_if_modified(|s| {
            if token < s.token {
                return false;
            }
            s.token = token;
            s.loading = false;
            s.error = None;
            true
        });
    }

    /// Drops the image for `token`; used when the current result has no audio.
    pub fn clear(&self, token: u64) {
        self.inner.state.send_if_modified(|s| {
            if token < s.token {
                return false;
            }
            s.token = token;
            s.loading = false;
            s.image = None;
            s.error = None;
            true
        });
    }

    pub async fn fetch_for_current_result(&self) -> WaveformOutcome {
        let token = self.inner.state.borrow().token;
        self.fetch_for(token).await
    }

    pub async fn fetch_for(&self, token: u64) -> WaveformOutcome {
        let started = self.inner.state.send_if_modified(|s| {
            if s.token != token {
                return false;
            }
            s.loading = true;
            s.error = None;
            true
        });
        if !started {
            log::debug!("waveform fetch for stale upload {token} skipped");
            return WaveformOutcome::Stale;
        }

        let fetched = match self.inner.service.fetch_waveform().await {
            Ok(image) => LocalImage::write(self.inner.dir.as_deref(), &image)
                .map(Arc::new)
                .map_err(|e| {
                    log::error!("store waveform failed: {e:#}");
                    ClientError::Transport("Failed to store waveform image.".into())
                }),
            Err(e) => Err(e),
        };

        let mut outcome = WaveformOutcome::Stale;
        self.inner.state.send_if_modified(|s| {
            if s.token != token {
                return false;
            }
            s.loading = false;
            match &fetched {
                Ok(image) => {
                    // Replacing the Arc releases the previous file.
                    s.image = Some(image.clone());
                    s.error = None;
                    outcome = WaveformOutcome::Ready(image.clone());
                }
                Err(e) => {
                    // The old image belongs to a previous result.
                    s.image = None;
                    s.error = Some(e.clone());
                    outcome = WaveformOutcome::Failed(e.clone());
                }
            }
            true
        });

        match &outcome {
            WaveformOutcome::Ready(image) => {
                log::info!("waveform ready: {} ({} bytes)", image.path().display(), image.len())
            }
            WaveformOutcome::Failed(e) => log::warn!("waveform fetch failed: {e}"),
            WaveformOutcome::Stale => log::debug!("waveform for upload {token} discarded"),
        }
        outcome
    }
}
