use crate::traits::{AudioPathCache, DescribeService};
use picnarrate_core::error::ClientError;
use picnarrate_core::types::Recording;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordingsState {
    /// Server order. Replaced wholesale on every successful load.
    pub recordings: Vec<Recording>,
    pub loading: bool,
    pub error: Option<ClientError>,
}

impl RecordingsState {
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ClientError::user_message)
    }
}

struct Inner {
    service: Arc<dyn DescribeService>,
    state: watch::Sender<RecordingsState>,
}

/// Previously generated recordings, fetched on demand.
#[derive(Clone)]
pub struct RecordingsFeed {
    inner: Arc<Inner>,
}

impl RecordingsFeed {
    pub fn new(service: Arc<dyn DescribeService>) -> Self {
        let (state, _) = watch::channel(RecordingsState::default());
        Self {
            inner: Arc::new(Inner { service, state }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RecordingsState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> RecordingsState {
        self.inner.state.borrow().clone()
    }

    /// Fetches the listing. On failure the previously loaded list stays in place.
    pub async fn load(&self) -> Result<Vec<Recording>, ClientError> {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.inner.service.list_recordings().await {
            Ok(urls) => {
                let recordings = Recording::from_listing(urls);
                log::info!("recordings loaded: {}", recordings.len());
                self.inner.state.send_modify(|s| {
                    s.loading = false;
                    s.recordings = recordings.clone();
                });
                Ok(recordings)
            }
            Err(e) => {
                log::warn!("recordings load failed: {e}");
                self.inner.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(e.clone());
                });
                Err(e)
            }
        }
    }

    /// Offline variant: shows the single cached audio reference, if any.
    ///
    /// Never fails and never writes to the cache. An unreadable cache counts as empty.
    pub fn restore_cached(&self, cache: &dyn AudioPathCache) -> Vec<Recording> {
        let cached = match cache.get() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("read cached audio path failed: {e:#}");
                None
            }
        };

        let urls: Vec<String> = cached
            .filter(|p| !p.trim().is_empty())
            .into_iter()
            .collect();
        let recordings = Recording::from_listing(urls);

        self.inner.state.send_modify(|s| {
            s.loading = false;
            s.error = None;
            s.recordings = recordings.clone();
        });
        recordings
    }
}
