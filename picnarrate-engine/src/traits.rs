use async_trait::async_trait;
use picnarrate_core::error::ClientError;
use picnarrate_core::media::{ImageFile, WaveformImage};
use picnarrate_core::types::{UploadOptions, UploadResult};
use std::sync::Arc;

/// Receives upload progress as an integer percentage.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// The remote describe/synthesize service, as seen by the engine.
#[async_trait]
pub trait DescribeService: Send + Sync {
    async fn upload(
        &self,
        file: &ImageFile,
        options: &UploadOptions,
        on_progress: ProgressFn,
    ) -> Result<UploadResult, ClientError>;

    /// Raw audio references, in server order.
    async fn list_recordings(&self) -> Result<Vec<String>, ClientError>;

    async fn fetch_waveform(&self) -> Result<WaveformImage, ClientError>;

    async fn fetch_output_path(&self) -> Result<String, ClientError>;
}

/// Single-slot persisted store for the last known audio reference.
pub trait AudioPathCache: Send + Sync {
    fn get(&self) -> anyhow::Result<Option<String>>;
    fn set(&self, audio_path: &str) -> anyhow::Result<()>;
}
