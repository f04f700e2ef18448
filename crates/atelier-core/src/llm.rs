use crate::config::ModelConfig;
use crate::error::{AtelierError, Result};

/// Black-box text generation collaborator: prompt in, plain text out.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Gemini-backed [`TextGenerator`].
pub struct GeminiClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client from configuration. A missing API key is a
    /// configuration error for the chat feature, raised here so callers can
    /// render a blocking message instead of failing mid-conversation.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        resolve_api_key(config)?;

        Ok(Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        })
    }
}

impl TextGenerator for GeminiClient {
    /// POST {base}/v1beta/models/{model}:generateContent
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = resolve_api_key(&self.config)?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com");

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base_url.trim_end_matches('/'),
            self.config.model,
            api_key,
        );

        let body = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
            }
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AtelierError::Model(format!("Gemini request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AtelierError::Model(format!("Gemini error {status}: {text}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AtelierError::Model(format!("Gemini response parse error: {e}")))?;

        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AtelierError::Model("Gemini response missing text".into()))
    }
}

/// Resolve the API key from config, a custom env var, or the default
/// `GEMINI_API_KEY` env var.
fn resolve_api_key(config: &ModelConfig) -> Result<String> {
    if let Some(ref key) = config.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    let env_var_name = config.env_var.as_deref().unwrap_or("GEMINI_API_KEY");

    std::env::var(env_var_name).map_err(|_| {
        AtelierError::Config(format!(
            "Gemini requires an API key (set model.api_key or {env_var_name})"
        ))
    })
}
