use crate::request::{Body, HttpRequest};
use anyhow::{Context, anyhow};
use futures_util::stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

/// Size of the slices handed to the transport while streaming an upload body.
pub const UPLOAD_CHUNK_BYTES: usize = 16 * 1024;

/// Called with `(bytes_sent, bytes_total)` as the request body is handed to the transport.
pub type BytesProgress = Arc<dyn Fn(u64, u64) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// `"503 Service Unavailable"`, or just the code when it has no canonical reason.
    pub fn status_text(&self) -> String {
        match reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> anyhow::Result<Self> {
        // Without an explicit timeout a stalled service would leave the workflow in flight forever.
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }

    pub async fn execute(&self, req: &HttpRequest) -> anyhow::Result<HttpResponse> {
        let builder = self.prepare(req)?;
        let builder = match &req.body {
            Body::Empty => builder,
            Body::MultipartFormData { bytes, .. } => builder.body(bytes.clone()),
        };
        send(builder).await
    }

    /// Like [`HttpClient::execute`], but streams the body in chunks and reports progress.
    pub async fn execute_with_progress(
        &self,
        req: &HttpRequest,
        on_progress: BytesProgress,
    ) -> anyhow::Result<HttpResponse> {
        let builder = self.prepare(req)?;
        let builder = match &req.body {
            Body::Empty => {
                on_progress(0, 0);
                builder
            }
            Body::MultipartFormData { bytes, .. } => {
                let total = bytes.len() as u64;
                builder
                    .header(CONTENT_LENGTH, total)
                    .body(progress_body(bytes.clone(), on_progress))
            }
        };
        send(builder).await
    }

    fn prepare(&self, req: &HttpRequest) -> anyhow::Result<reqwest::RequestBuilder> {
        let mut headers = HeaderMap::new();
        for (k, v) in &req.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .with_context(|| format!("invalid header name: {k}"))?;
            let value = HeaderValue::from_str(v)
                .with_context(|| format!("invalid header value for {k}"))?;
            headers.insert(name, value);
        }

        let builder = match req.method.as_str() {
            "GET" => self.client.get(&req.url),
            "POST" => self.client.post(&req.url),
            other => return Err(anyhow!("unsupported method: {other}")),
        }
        .headers(headers);
        Ok(builder)
    }
}

async fn send(builder: reqwest::RequestBuilder) -> anyhow::Result<HttpResponse> {
    let resp = builder.send().await.context("http request failed")?;
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp
        .bytes()
        .await
        .context("failed reading response body")?
        .to_vec();

    Ok(HttpResponse {
        status,
        content_type,
        body,
    })
}

fn progress_body(bytes: Vec<u8>, on_progress: BytesProgress) -> reqwest::Body {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes
        .chunks(UPLOAD_CHUNK_BYTES)
        .map(|c| c.to_vec())
        .collect();

    let mut sent = 0u64;
    let chunks = stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        on_progress(sent, total);
        Ok::<_, std::io::Error>(chunk)
    }));
    reqwest::Body::wrap_stream(chunks)
}

/// Integer percentage in `[0, 100]`. An empty body counts as fully sent.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = sent.min(total).saturating_mul(100) / total;
    pct as u8
}
