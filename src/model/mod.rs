pub mod direct;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::GeminiConfig;
use crate::web::models::{Role, Turn};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("request to provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("prompt blocked by provider: {0}")]
    Blocked(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Backend that produces a reply for a message and the turns preceding it.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, message: &str, history: &[Turn]) -> Result<String, ProviderError>;
}

/// Client for the generative-language `generateContent` endpoint.
pub struct GeminiModel {
    api_base: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiModel {
    pub fn new(config: &GeminiConfig) -> Self {
        info!(
            "Using generative-language API at {} with model {}",
            config.api_base, config.model
        );

        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl GenerationProvider for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, message: &str, history: &[Turn]) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("GOOGLE_API_KEY"))?;

        let payload = build_payload(message, history);
        info!("Sending message to {} with {} prior turns", self.model, history.len());
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: error_message(&error_text),
            });
        }

        let response_json: Value = response.json().await?;
        debug!("Response JSON: {}", response_json);

        let content = extract_text(&response_json)?;
        info!("Response length: {} characters", content.len());
        Ok(content)
    }
}

/// Builds the `contents` array: prior turns in order, then the new message.
fn build_payload(message: &str, history: &[Turn]) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::Assistant => "model",
                Role::User => "user",
            };
            json!({ "role": role, "parts": [{ "text": turn.content }] })
        })
        .collect();

    contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));

    json!({ "contents": contents })
}

fn extract_text(response_json: &Value) -> Result<String, ProviderError> {
    let candidate = response_json
        .get("candidates")
        .and_then(|candidates| candidates.get(0));

    let Some(candidate) = candidate else {
        if let Some(reason) = response_json
            .get("promptFeedback")
            .and_then(|feedback| feedback.get("blockReason"))
            .and_then(|reason| reason.as_str())
        {
            return Err(ProviderError::Blocked(reason.to_string()));
        }
        return Err(ProviderError::MalformedResponse("no candidates in response".into()));
    };

    let texts: Vec<&str> = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .map(|parts| parts.iter().filter_map(|part| part["text"].as_str()).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
        return Err(ProviderError::MalformedResponse(format!(
            "candidate has no text (finish reason: {})",
            reason
        )));
    }

    Ok(texts.concat())
}

/// Pulls `error.message` out of an error body, or returns the body as-is.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
pub(crate) mod fake_upstream {
    use std::sync::{Arc, Mutex};

    use actix_web::dev::ServerHandle;
    use actix_web::http::StatusCode;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::Value;

    #[derive(Debug, Clone)]
    pub struct Captured {
        pub path: String,
        pub headers: Vec<(String, String)>,
        pub body: Value,
    }

    impl Captured {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    /// In-process HTTP server answering every request with a fixed JSON-typed reply.
    pub struct FakeUpstream {
        pub base_url: String,
        pub captured: Arc<Mutex<Vec<Captured>>>,
        handle: ServerHandle,
    }

    impl FakeUpstream {
        pub async fn start(status: u16, reply: Value) -> Self {
            Self::start_raw(status, reply.to_string()).await
        }

        /// Sends `body` verbatim with an `application/json` content type.
        pub async fn start_raw(status: u16, reply: String) -> Self {
            let captured = Arc::new(Mutex::new(Vec::new()));
            let sink = captured.clone();

            let server = HttpServer::new(move || {
                let sink = sink.clone();
                let reply = reply.clone();
                App::new().default_service(web::to(
                    move |req: HttpRequest, payload: web::Bytes| {
                        let sink = sink.clone();
                        let reply = reply.clone();
                        async move {
                            sink.lock().unwrap().push(Captured {
                                path: req.path().to_string(),
                                headers: req
                                    .headers()
                                    .iter()
                                    .map(|(k, v)| {
                                        (k.to_string(), v.to_str().unwrap_or("").to_string())
                                    })
                                    .collect(),
                                body: serde_json::from_slice(&payload).unwrap_or(Value::Null),
                            });
                            HttpResponse::build(StatusCode::from_u16(status).unwrap())
                                .content_type("application/json")
                                .body(reply)
                        }
                    },
                ))
            })
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();

            let addr = server.addrs()[0];
            let server = server.run();
            let handle = server.handle();
            actix_web::rt::spawn(server);

            Self {
                base_url: format!("http://{}", addr),
                captured,
                handle,
            }
        }

        pub fn requests(&self) -> Vec<Captured> {
            self.captured.lock().unwrap().clone()
        }

        pub async fn stop(self) {
            self.handle.stop(false).await;
        }
    }
}
