//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::CounselError;
use crate::models::capabilities::ModelCapabilities;
use crate::models::google::GoogleModel;
use crate::types::*;
use crate::util::retry::RetryPolicy;

use super::http::{google_headers, shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    model: GoogleModel,
    api_key: String,
    base_url: String,
    capabilities: ModelCapabilities,
    retry: RetryPolicy,
}

impl GoogleProvider {
    pub fn new(model: GoogleModel, api_key: String, base_url: Option<String>) -> Self {
        let capabilities = model.capabilities();
        Self {
            model,
            api_key,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| BASE_URL.to_string()),
            capabilities,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model.as_str())
    }

    pub(crate) fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let contents: Vec<Value> = request.messages.iter().map(gemini_content).collect();

        let mut body = json!({ "contents": contents });
        let Some(obj) = body.as_object_mut() else {
            return body;
        };

        if let Some(ref sys) = request.system_instruction {
            obj.insert(
                "systemInstruction".into(),
                json!({ "parts": [{ "text": sys }] }),
            );
        }

        let mut gen_config = serde_json::Map::new();
        if let Some(max) = request.settings.max_tokens {
            gen_config.insert("maxOutputTokens".into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            gen_config.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            gen_config.insert("topP".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            gen_config.insert("stopSequences".into(), json!(stops));
        }
        if !gen_config.is_empty() {
            obj.insert("generationConfig".into(), Value::Object(gen_config));
        }

        if let Some(ref tools) = request.tools {
            let fn_decls: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    })
                })
                .collect();
            obj.insert("tools".into(), json!([{ "functionDeclarations": fn_decls }]));
        }

        body
    }

    async fn send_once(&self, body: &Value) -> Result<ProviderResponse, CounselError> {
        let resp = shared_client()
            .post(self.endpoint())
            .headers(google_headers(&self.api_key))
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: GeminiResponse = resp.json().await?;
        parse_response(data)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, CounselError> {
        let body = self.build_request_body(request);

        debug!(
            model = self.model.as_str(),
            turns = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Google generate_text"
        );

        self.retry.execute(|| self.send_once(&body)).await
    }
}

fn gemini_content(msg: &ModelMessage) -> Value {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "model",
        Role::Tool => "function",
    };
    let parts: Vec<Value> = msg
        .content
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => json!({ "text": text }),
            ContentPart::ToolCall(tc) => json!({
                "functionCall": { "name": tc.name, "args": tc.arguments }
            }),
            ContentPart::ToolResult(tr) => json!({
                "functionResponse": { "name": tr.name, "response": tr.result }
            }),
        })
        .collect();
    json!({ "role": role, "parts": parts })
}

fn parse_response(data: GeminiResponse) -> Result<ProviderResponse, CounselError> {
    let usage = data
        .usage_metadata
        .map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
        .unwrap_or_default();

    let candidate = data
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| CounselError::api(200, "No candidates in Gemini response"))?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if let Some(fc) = part.function_call {
            tool_calls.push(ToolCall {
                id: uuid::Uuid::new_v4().to_string(),
                name: fc.name,
                arguments: fc.args.unwrap_or_else(|| Value::Object(Default::default())),
            });
        }
    }

    let finish_reason = if !tool_calls.is_empty() {
        Some(FinishReason::ToolCalls)
    } else {
        match candidate.finish_reason.as_deref() {
            Some("STOP") => Some(FinishReason::Stop),
            Some("MAX_TOKENS") => Some(FinishReason::Length),
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => {
                Some(FinishReason::ContentFilter)
            }
            Some(_) => Some(FinishReason::Error),
            None => None,
        }
    };

    Ok(ProviderResponse {
        text,
        usage,
        tool_calls,
        finish_reason,
    })
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}
