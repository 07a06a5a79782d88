use base64::Engine;
use picnarrate_core::media::WaveformImage;

const DEFAULT_IMAGE_TYPE: &str = "image/png";

/// File extension for a waveform payload; the service renders PNG unless it says otherwise.
pub fn extension_for(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match essence.as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        _ => "png",
    }
}

/// Inline `data:` URL, for consumers that cannot read a local file.
pub fn data_url(image: &WaveformImage) -> String {
    let ct = image
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_TYPE);
    let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
    format!("data:{ct};base64,{encoded}")
}
