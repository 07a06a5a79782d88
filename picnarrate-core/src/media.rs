use crate::error::ClientError;
use crate::types::UploadOptions;

#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    /// Builds a file whose MIME type is guessed from its extension.
    /// Unknown extensions become `application/octet-stream` and fail validation later.
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = guess_image_mime(&filename)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            filename,
            mime_type,
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

pub fn guess_image_mime(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

/// One submission. Constructed per attempt and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadRequest {
    pub file: Option<ImageFile>,
    pub options: UploadOptions,
}

impl UploadRequest {
    pub fn new(file: ImageFile, options: UploadOptions) -> Self {
        Self {
            file: Some(file),
            options,
        }
    }

    pub fn validate(&self) -> Result<(&ImageFile, &UploadOptions), ClientError> {
        let file = self.file.as_ref().ok_or_else(ClientError::no_file)?;
        if !file.is_image() {
            return Err(ClientError::Validation(
                crate::error::NOT_AN_IMAGE.to_string(),
            ));
        }
        Ok((file, &self.options))
    }
}

/// Raw waveform payload as returned by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct WaveformImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl std::fmt::Debug for WaveformImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformImage")
            .field("bytes_len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}
