use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use concierge_core::config::GenerationSettings;
use concierge_core::{Error, Result, TextGenerator};
use concierge_embed::gemini::{http_client, post_json, qualified_model, Content};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::GenerationService("model returned no candidates".to_string()))?;
        let text: String = candidate.content.map(|c| c.parts.into_iter().map(|p| p.text).collect()).unwrap_or_default();
        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(Error::GenerationService(format!("model returned an empty answer (finish reason: {reason})")));
        }
        Ok(text)
    }
}

/// `generateContent` client for Gemini chat models.
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, settings: &GenerationSettings) -> Result<Self> {
        Ok(Self {
            client: http_client(settings.timeout_secs)?,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: qualified_model(&settings.model),
            api_key: api_key.into(),
            temperature: settings.temperature,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    fn request(&self, system: &str, user: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content::text(system),
            contents: vec![Content::user(user)],
            generation_config: self.temperature.map(|t| GenerationConfig { temperature: Some(t) }),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let response: GenerateContentResponse =
            post_json(&self.client, &self.url(), &self.api_key, &self.request(system, user), Error::GenerationService).await?;
        response.into_text()
    }
}
