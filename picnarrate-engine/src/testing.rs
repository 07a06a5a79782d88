use crate::traits::{AudioPathCache, DescribeService, ProgressFn};
use async_trait::async_trait;
use picnarrate_core::error::ClientError;
use picnarrate_core::media::{ImageFile, WaveformImage};
use picnarrate_core::types::{UploadOptions, UploadResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

struct ScriptedUpload {
    progress: Vec<u8>,
    gate: Option<oneshot::Receiver<()>>,
    result: Result<UploadResult, ClientError>,
}

type Gated<T> = (Option<oneshot::Receiver<()>>, Result<T, ClientError>);

/// Scripted service: each call pops the next queued answer.
#[derive(Default)]
pub(crate) struct FakeService {
    uploads: Mutex<VecDeque<ScriptedUpload>>,
    recordings: Mutex<VecDeque<Gated<Vec<String>>>>,
    waveforms: Mutex<VecDeque<Gated<WaveformImage>>>,
    uploaded: Mutex<Vec<(String, UploadOptions)>>,
    upload_calls: AtomicUsize,
    waveform_calls: AtomicUsize,
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_upload(&self, progress: Vec<u8>, result: Result<UploadResult, ClientError>) {
        self.uploads.lock().unwrap().push_back(ScriptedUpload {
            progress,
            gate: None,
            result,
        });
    }

    /// The upload reports `progress`, then waits until the returned sender fires.
    pub fn push_gated_upload(
        &self,
        progress: Vec<u8>,
        result: Result<UploadResult, ClientError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.uploads.lock().unwrap().push_back(ScriptedUpload {
            progress,
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn push_recordings(&self, result: Result<Vec<String>, ClientError>) {
        self.recordings.lock().unwrap().push_back((None, result));
    }

    pub fn push_waveform(&self, result: Result<WaveformImage, ClientError>) {
        self.waveforms.lock().unwrap().push_back((None, result));
    }

    pub fn push_gated_waveform(
        &self,
        result: Result<WaveformImage, ClientError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.waveforms.lock().unwrap().push_back((Some(rx), result));
        tx
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn waveform_calls(&self) -> usize {
        self.waveform_calls.load(Ordering::SeqCst)
    }

    pub fn uploaded(&self) -> Vec<(String, UploadOptions)> {
        self.uploaded.lock().unwrap().clone()
    }
}

async fn open<T>(entry: Option<Gated<T>>, what: &str) -> Result<T, ClientError> {
    let Some((gate, result)) = entry else {
        return Err(ClientError::Transport(format!("unscripted {what}")));
    };
    if let Some(gate) = gate {
        let _ = gate.await;
    }
    result
}

#[async_trait]
impl DescribeService for FakeService {
    async fn upload(
        &self,
        file: &ImageFile,
        options: &UploadOptions,
        on_progress: ProgressFn,
    ) -> Result<UploadResult, ClientError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded
            .lock()
            .unwrap()
            .push((file.filename.clone(), *options));

        let scripted = self.uploads.lock().unwrap().pop_front();
        let Some(scripted) = scripted else {
            return Err(ClientError::Transport("unscripted upload".into()));
        };
        for p in scripted.progress {
            on_progress(p);
        }
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.result
    }

    async fn list_recordings(&self) -> Result<Vec<String>, ClientError> {
        let entry = self.recordings.lock().unwrap().pop_front();
        open(entry, "recordings").await
    }

    async fn fetch_waveform(&self) -> Result<WaveformImage, ClientError> {
        self.waveform_calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.waveforms.lock().unwrap().pop_front();
        open(entry, "waveform").await
    }

    async fn fetch_output_path(&self) -> Result<String, ClientError> {
        Err(ClientError::Transport("unscripted output path".into()))
    }
}

#[derive(Default)]
pub(crate) struct MemoryCache {
    pub value: Mutex<Option<String>>,
    pub fail_reads: bool,
    pub writes: AtomicUsize,
}

impl AudioPathCache for MemoryCache {
    fn get(&self) -> anyhow::Result<Option<String>> {
        if self.fail_reads {
            return Err(anyhow::anyhow!("storage unavailable"));
        }
        Ok(self.value.lock().unwrap().clone())
    }

    fn set(&self, audio_path: &str) -> anyhow::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.value.lock().unwrap() = Some(audio_path.to_string());
        Ok(())
    }
}
