//! Display-only translation collaborator.
//!
//! Lookups go through a pluggable key-value cache keyed on the source
//! string; a miss calls the external translation service. A failing
//! backend degrades to the original English text instead of propagating —
//! translation is cosmetic and never touches persisted data.

use async_trait::async_trait;
use herbarium_core::Cache;

/// Outbound translation call. Implementations are free to talk to any
/// service; failures are reported, not swallowed, so the caller decides
/// the fallback.
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    async fn translate(&self, text: &str) -> anyhow::Result<String>;
}

/// HTTP backend for a MyMemory-style `?q=...&langpair=en|ja` endpoint.
pub struct HttpTranslateBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranslateBackend {
    pub fn new(base_url: String) -> Self {
        Self { client: reqwest::Client::new(), base_url }
    }
}

#[async_trait]
impl TranslateBackend for HttpTranslateBackend {
    async fn translate(&self, text: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", text), ("langpair", "en|ja")])
            .send()
            .await?
            .error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        body.pointer("/responseData/translatedText")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("translation response missing translatedText"))
    }
}

pub struct Translator {
    cache: Box<dyn Cache>,
    backend: Box<dyn TranslateBackend>,
}

impl Translator {
    pub fn new(cache: Box<dyn Cache>, backend: Box<dyn TranslateBackend>) -> Self {
        Self { cache, backend }
    }

    /// Returns the Japanese rendering of `text_en`, or `text_en` unchanged
    /// when the external service fails. Failures are never cached.
    pub async fn translate(&self, text_en: &str) -> String {
        if let Some(hit) = self.cache.get(text_en) {
            return hit;
        }
        match self.backend.translate(text_en).await {
            Ok(text_ja) => {
                self.cache.set(text_en, text_ja.clone());
                text_ja
            }
            Err(err) => {
                tracing::warn!(
                    text = text_en,
                    error = %err,
                    "translation lookup failed, falling back to source text"
                );
                text_en.to_owned()
            }
        }
    }
}
