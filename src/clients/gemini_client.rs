//! Gemini 客户端
//!
//! 直接调用 `models/{model}:generateContent` REST 接口，
//! 通过 `responseMimeType` + `responseSchema` 要求模型输出符合结构的 JSON。

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::clients::{is_credential_rejection, require_api_key, GenerationBackend, GenerationRequest};
use crate::config::Config;
use crate::error::GenerationError;
use crate::models::exercise::ExerciseTypeId;

/// Gemini 生成服务
pub struct GeminiBackend {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base_url: String,
    model_name: String,
    temperature: f32,
}

impl GeminiBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.llm_api_key.clone(),
            api_base_url: config.api_base_url().trim_end_matches('/').to_string(),
            model_name: config.model_name().to_string(),
            temperature: config.llm_temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, self.model_name)
    }

    fn build_body(&self, request: &GenerationRequest) -> JsonValue {
        json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_prompt }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.user_prompt }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json",
                "responseSchema": request.response_schema,
            }
        })
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = require_api_key(self.api_key.as_deref())?;

        debug!(
            "[练习 {}] 调用 Gemini generateContent，模型: {}",
            request.exercise_type, self.model_name
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| {
                warn!("[练习 {}] Gemini 请求失败: {}", request.exercise_type, e);
                GenerationError::transient(format!("请求失败: {}", e))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::transient(format!("读取响应失败: {}", e)))?;

        if !(200..300).contains(&status) {
            warn!(
                "[练习 {}] Gemini 返回错误状态 {}",
                request.exercise_type, status
            );
            return Err(classify_http_failure(status, &body));
        }

        debug!("[练习 {}] Gemini 调用成功", request.exercise_type);
        extract_text(request.exercise_type, &body)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

/// 取出第一个候选的全部文本
fn extract_text(exercise_type: ExerciseTypeId, body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::transient(format!("无法解析 Gemini 响应: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::empty(exercise_type));
    }
    Ok(text)
}

/// 非 2xx 响应的错误分类
fn classify_http_failure(status: u16, body: &str) -> GenerationError {
    let (message, google_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.trim().to_string(), None),
    };

    // details 中的 reason（如 API_KEY_INVALID）不在 message 里，直接看原始响应
    let rejected = is_credential_rejection(Some(status), google_status.as_deref(), &message)
        || body.contains("API_KEY_INVALID");

    if rejected {
        GenerationError::InvalidCredential { message }
    } else {
        GenerationError::transient(format!("HTTP {}: {}", status, message))
    }
}
