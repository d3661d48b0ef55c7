//! Alternate provider that talks to a plain JSON endpoint with bearer auth.
//! Only the new message is sent; prior turns are not part of this API.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use super::{GenerationProvider, ProviderError};
use crate::config::DirectConfig;
use crate::web::models::Turn;

const NO_CONTENT_REPLY: &str = "Sorry, I couldn't generate a response.";

pub struct DirectModel {
    api_url: String,
    api_key: Option<String>,
    client: Client,
}

impl DirectModel {
    pub fn new(config: &DirectConfig) -> Self {
        info!("Using direct generation endpoint at {}", config.api_url);
        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl GenerationProvider for DirectModel {
    fn name(&self) -> &str {
        "direct"
    }

    async fn generate(&self, message: &str, _history: &[Turn]) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("GEMINI_API_KEY"))?;

        let payload = json!({ "input": message });
        debug!("Sending request to direct endpoint: {}", payload);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Response from direct endpoint: {} - {}", status, body);

        if status.as_u16() != 200 {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(result
            .get("generated_content")
            .and_then(|content| content.as_str())
            .unwrap_or(NO_CONTENT_REPLY)
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake_upstream::FakeUpstream;
    use super::*;
    use crate::web::models::Role;

    fn model_for(url: &str) -> DirectModel {
        DirectModel::new(&DirectConfig {
            api_url: url.to_string(),
            api_key: Some("token".to_string()),
        })
    }

    #[actix_web::test]
    async fn sends_input_with_bearer_token() {
        let upstream = FakeUpstream::start(200, json!({ "generated_content": "Gemini says hi" })).await;
        let model = model_for(&format!("{}/v1/model", upstream.base_url));

        let history = vec![Turn {
            role: Role::User,
            content: "ignored".to_string(),
        }];
        let text = model.generate("Write a haiku", &history).await.unwrap();
        assert_eq!(text, "Gemini says hi");

        let requests = upstream.requests();
        assert_eq!(requests[0].path, "/v1/model");
        assert_eq!(requests[0].header("authorization"), Some("Bearer token"));
        assert_eq!(requests[0].body, json!({ "input": "Write a haiku" }));

        upstream.stop().await;
    }

    #[actix_web::test]
    async fn missing_content_field_yields_apology() {
        let upstream = FakeUpstream::start(200, json!({ "other": 1 })).await;
        let model = model_for(&upstream.base_url);

        let text = model.generate("Write a haiku", &[]).await.unwrap();
        assert_eq!(text, NO_CONTENT_REPLY);

        upstream.stop().await;
    }

    #[actix_web::test]
    async fn non_200_is_an_error() {
        let upstream = FakeUpstream::start(502, json!({ "detail": "bad gateway" })).await;
        let model = model_for(&upstream.base_url);

        let result = model.generate("Write a haiku", &[]).await;
        assert!(matches!(result, Err(ProviderError::Status { status: 502, .. })));

        upstream.stop().await;
    }

    #[actix_web::test]
    async fn missing_key_is_an_error() {
        let model = DirectModel::new(&DirectConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
        });
        let result = model.generate("Write a haiku", &[]).await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey("GEMINI_API_KEY"))));
    }
}
