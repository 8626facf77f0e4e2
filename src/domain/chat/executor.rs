use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config;
use crate::database::models::{Configuration, Message};
use crate::domain::chat::{ChatExecutor, ExecutorReply};
use crate::domain::{DomainError, DomainResult};

/// Talks to the executor endpoint stored on the configuration.
///
/// Request body: `{"query": ..., "history": [{"type", "content"}, ...]}`.
/// Reply body: `{"text": ..., "tokens": <optional count>}`.
pub struct HttpChatExecutor {
    client: reqwest::Client,
}

impl HttpChatExecutor {
    pub fn new() -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config::config().chat.executor_timeout_secs))
            .build()
            .map_err(|e| DomainError::internal(format!("failed to build http client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ChatExecutor for HttpChatExecutor {
    async fn execute(
        &self,
        configuration: &Configuration,
        query: &str,
        history: &[Message],
    ) -> DomainResult<ExecutorReply> {
        let endpoint = configuration
            .executor_endpoint
            .as_deref()
            .ok_or_else(|| DomainError::validation("Configuration has no executor endpoint."))?;

        let history: Vec<Value> = history
            .iter()
            .map(|m| {
                json!({
                    "type": m.message_type,
                    "content": m.data.get("content").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        let mut request = self.client.post(endpoint).json(&json!({
            "query": query,
            "history": history,
        }));

        // Extra headers (API keys etc.) live on the configuration as a
        // JSON object string.
        if let Some(headers) = &configuration.executor_headers {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(headers) {
                for (name, value) in map {
                    if let Some(value) = value.as_str() {
                        request = request.header(name.as_str(), value);
                    }
                }
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("executor request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::internal(format!(
                "executor returned status {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DomainError::internal(format!("executor returned invalid JSON: {e}")))?;

        let text = body
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let tokens = body.get("tokens").and_then(Value::as_i64);

        Ok(ExecutorReply { text, tokens })
    }
}
