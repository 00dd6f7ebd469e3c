//! Google Generative Language API: shared wire types and the embedding client.
//!
//! Passages are embedded with `batchEmbedContents` (`RETRIEVAL_DOCUMENT`),
//! questions with `embedContent` (`RETRIEVAL_QUERY`). The key travels in the
//! `x-goog-api-key` header.

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use concierge_core::config::EmbeddingSettings;
use concierge_core::{Embedder, Error, Result, Vector};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self { role: None, parts: vec![Part { text: text.into() }] }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Some("user".to_string()), ..Self::text(text) }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Prefer the API's own error message, fall back to the raw body.
pub fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => format!("API error {status}: {}", parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("API error {status}"),
        Err(_) => format!("API error {status}: {}", body.trim()),
    }
}

pub fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

/// `models/embedding-001` and `embedding-001` address the same model.
pub fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") { model.to_string() } else { format!("models/{model}") }
}

pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))
}

/// POST `body` as JSON and decode the reply. Failures are passed through
/// `wrap` so each client reports its own error kind.
pub async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &Req,
    wrap: fn(String) -> Error,
) -> Result<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| wrap(describe_transport_error(&e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(wrap(api_error_message(status, &body)));
    }

    let text = response.text().await.map_err(|e| wrap(describe_transport_error(&e)))?;
    serde_json::from_str(&text).map_err(|e| wrap(format!("malformed response: {e}")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content,
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

pub struct GeminiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dims: usize,
    batch_size: usize,
}

impl GeminiEmbedder {
    pub fn new(api_key: impl Into<String>, settings: &EmbeddingSettings) -> Result<Self> {
        Ok(Self {
            client: http_client(settings.timeout_secs)?,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: qualified_model(&settings.model),
            api_key: api_key.into(),
            dims: settings.dimension,
            batch_size: settings.batch_size.max(1),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}:{}", self.endpoint, self.model, method)
    }

    fn check_dim(&self, v: &[f32]) -> Result<()> {
        if v.len() != self.dims {
            return Err(Error::EmbeddingService(format!("dimension mismatch: got {} expected {}", v.len(), self.dims)));
        }
        Ok(())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|t| EmbedContentRequest { model: &self.model, content: Content::text(t.as_str()), task_type: "RETRIEVAL_DOCUMENT" })
                .collect(),
        };
        let response: BatchEmbedResponse =
            post_json(&self.client, &self.url("batchEmbedContents"), &self.api_key, &request, Error::EmbeddingService).await?;
        if response.embeddings.len() != texts.len() {
            return Err(Error::EmbeddingService(format!(
                "embedder returned {} vectors for {} inputs",
                response.embeddings.len(),
                texts.len()
            )));
        }
        let vectors: Vec<Vector> = response.embeddings.into_iter().map(|e| e.values).collect();
        for v in &vectors { self.check_dim(v)?; }
        Ok(vectors)
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    fn dim(&self) -> usize {
        self.dims
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        tracing::info!(model = %self.model, inputs = texts.len(), batch_size = self.batch_size, "embedding passages");
        let pb = progress_bar(texts.len());
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            match self.embed_batch(batch).await {
                Ok(vectors) => out.extend(vectors),
                Err(e) => {
                    pb.abandon_with_message("embedding failed");
                    return Err(e);
                }
            }
            pb.set_position(out.len() as u64);
        }
        pb.finish_with_message("embedded");
        Ok(out)
    }

    async fn embed_query(&self, text: &str) -> Result<Vector> {
        let request = EmbedContentRequest { model: &self.model, content: Content::text(text), task_type: "RETRIEVAL_QUERY" };
        let response: EmbedContentResponse =
            post_json(&self.client, &self.url("embedContent"), &self.api_key, &request, Error::EmbeddingService).await?;
        self.check_dim(&response.embedding.values)?;
        Ok(response.embedding.values)
    }
}
