use crate::endpoints::Endpoints;
use crate::request::{Body, HttpRequest};
use picnarrate_core::media::ImageFile;
use picnarrate_core::types::UploadOptions;

pub fn build_upload_request(
    endpoints: &Endpoints,
    file: &ImageFile,
    options: &UploadOptions,
) -> HttpRequest {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let mut body: Vec<u8> = Vec::with_capacity(file.bytes.len() + 512);

    append_file(
        &mut body,
        &boundary,
        "file",
        &file.filename,
        &file.mime_type,
        &file.bytes,
    );
    append_field(&mut body, &boundary, "description_mode", options.mode.as_str());

    // Speaker and language are optional; the service picks its own defaults when absent.
    if let Some(speaker) = options.speaker {
        append_field(&mut body, &boundary, "speaker", speaker.as_str());
    }
    if let Some(language) = options.language {
        append_field(&mut body, &boundary, "language", language.as_str());
    }

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    HttpRequest {
        method: "POST".into(),
        url: endpoints.upload_url(),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "application/json".into()),
        ],
        body: Body::MultipartFormData {
            boundary,
            bytes: body,
        },
    }
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name,
            escape_quotes(filename)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "%22").replace(['\r', '\n'], "")
}
