use std::path::{Path, PathBuf};

use anyhow::Context;
use picnarrate_engine::traits::AudioPathCache;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheDocument {
    #[serde(rename = "audioPath", default, skip_serializing_if = "Option::is_none")]
    audio_path: Option<String>,
}

/// Persists the last known audio reference in a small JSON document (`{"audioPath": "..."}`).
///
/// One slot, no expiry, no size bound.
#[derive(Debug, Clone)]
pub struct FileAudioPathCache {
    path: PathBuf,
}

impl FileAudioPathCache {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioPathCache for FileAudioPathCache {
    fn get(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read(&self.path)
            .with_context(|| format!("read audio cache: {}", self.path.display()))?;
        let doc: CacheDocument = serde_json::from_slice(&raw)
            .with_context(|| format!("decode audio cache: {}", self.path.display()))?;
        Ok(doc.audio_path)
    }

    fn set(&self, audio_path: &str) -> anyhow::Result<()> {
        let doc = CacheDocument {
            audio_path: Some(audio_path.to_string()),
        };
        let json = serde_json::to_vec_pretty(&doc).context("encode audio cache")?;
        crate::fs::write_atomic(&self.path, &json)
            .with_context(|| format!("write audio cache: {}", self.path.display()))
    }
}
