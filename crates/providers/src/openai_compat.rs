//! OpenAI-compatible chat completions client.
//!
//! Works with the AIML API and any other endpoint following the OpenAI
//! `/chat/completions` contract (Together, vLLM, Ollama, LM Studio).

use std::time::{Duration, Instant};

use serde_json::Value;

use dc_domain::chat::ToolCall;
use dc_domain::config::LlmConfig;
use dc_domain::error::{Error, Result};
use dc_domain::trace::TraceEvent;

use crate::traits::{ChatRequest, ChatResponse, CompletionClient};
use crate::util::from_reqwest;

/// Pause before the single retry of a transport failure.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct OpenAiCompatClient {
    id: String,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
    top_p: f32,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Build a client from the `[llm]` config section. A missing API key
    /// is tolerated at construction time so offline commands still work;
    /// the endpoint will reject unauthenticated requests at call time.
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = match std::env::var(&cfg.api_key_env) {
            Ok(key) if !key.is_empty() => Some(key),
            _ => {
                tracing::warn!(
                    env_var = %cfg.api_key_env,
                    "API key environment variable not set; requests will be unauthenticated"
                );
                None
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: "openai_compat".into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            default_model: cfg.model.clone(),
            top_p: cfg.top_p,
            client,
        })
    }

    fn authed_post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        builder
    }

    fn build_chat_body(&self, req: &ChatRequest) -> Value {
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let mut body = serde_json::json!({
            "model": model,
            "messages": req.messages,
            "top_p": self.top_p,
        });

        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if !req.tools.is_empty() {
            let tools: Vec<Value> = req
                .tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body["tools"] = Value::Array(tools);
            body["tool_choice"] = Value::String("auto".into());
        }
        body
    }

    async fn send_once(&self, body: &Value) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .authed_post(&url)
            .json(body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let text = resp.text().await.map_err(from_reqwest)?;
        tracing::debug!(status = %status, body = %text, "completion response");

        if !status.is_success() {
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {status} - {text}"),
            });
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| Error::MalformedResponse(format!("invalid JSON body: {e}")))?;
        parse_chat_response(&self.id, &value)
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let body = self.build_chat_body(req);
        let started = Instant::now();

        let mut retried = false;
        let result = match self.send_once(&body).await {
            Err(e) if e.is_transport() => {
                TraceEvent::CompletionRetry {
                    reason: e.to_string(),
                }
                .emit();
                retried = true;
                tokio::time::sleep(RETRY_BACKOFF).await;
                self.send_once(&body).await
            }
            other => other,
        };

        TraceEvent::CompletionRequest {
            model: body["model"].as_str().unwrap_or_default().to_string(),
            with_tools: !req.tools.is_empty(),
            duration_ms: started.elapsed().as_millis() as u64,
            retried,
        }
        .emit();

        result
    }

    fn client_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_chat_response(provider: &str, value: &Value) -> Result<ChatResponse> {
    // API-level errors come back as 200 bodies on some endpoints.
    if let Some(err) = value.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown API error");
        return Err(Error::Provider {
            provider: provider.into(),
            message: message.into(),
        });
    }

    let choice = value
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| Error::MalformedResponse("no choices in response".into()))?;
    let message = choice
        .get("message")
        .ok_or_else(|| Error::MalformedResponse("choice has no message".into()))?;

    let content = message
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let tool_calls = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .map(|calls| parse_tool_calls(calls))
        .unwrap_or_default();

    Ok(ChatResponse {
        content,
        tool_calls,
        model: value
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        finish_reason: choice
            .get("finish_reason")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Extract tool calls, skipping entries without a function name. The
/// `arguments` field stays a raw JSON-encoded string; the tool resolver
/// owns parsing it so argument errors surface in the right place.
fn parse_tool_calls(calls: &[Value]) -> Vec<ToolCall> {
    calls
        .iter()
        .filter_map(|call| {
            let function = call.get("function")?;
            let tool_name = function.get("name").and_then(Value::as_str)?.to_string();
            let arguments = function
                .get("arguments")
                .and_then(Value::as_str)
                .unwrap_or("{}")
                .to_string();
            let call_id = call
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4()));
            Some(ToolCall {
                call_id,
                tool_name,
                arguments,
            })
        })
        .collect()
}
