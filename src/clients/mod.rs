//! 生成服务客户端 - 基础设施层
//!
//! 每个客户端只负责"把一次生成请求发给外部服务并拿回原始文本"，
//! 不关心练习结构，也不做结构校验。
//!
//! - `GeminiBackend` - Google Gemini `generateContent`（带 `responseSchema`）
//! - `OpenAiBackend` - 兼容 OpenAI Chat Completions 的服务

pub mod gemini_client;
pub mod openai_client;
#[cfg(test)]
pub(crate) mod scripted;
#[cfg(test)]
pub(crate) mod stub_server;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::config::{Config, Provider, API_KEY_VAR};
use crate::error::GenerationError;
use crate::models::exercise::ExerciseTypeId;

pub use gemini_client::GeminiBackend;
pub use openai_client::OpenAiBackend;

/// 一次生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub exercise_type: ExerciseTypeId,
    pub system_prompt: String,
    pub user_prompt: String,
    /// 期望的响应结构
    pub response_schema: JsonValue,
}

/// 外部生成服务
///
/// 成功时返回模型输出的原始文本（期望是 JSON），失败时返回已分类的错误。
/// 每次调用最多发出一次网络请求，调用之间不保留状态。
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// 根据配置创建对应的生成服务
pub fn backend_from_config(config: &Config) -> Arc<dyn GenerationBackend> {
    match config.provider {
        Provider::Gemini => Arc::new(GeminiBackend::new(config)),
        Provider::OpenAi => Arc::new(OpenAiBackend::new(config)),
    }
}

/// 取出 API 密钥，未配置时返回凭证缺失错误
pub(crate) fn require_api_key(api_key: Option<&str>) -> Result<&str, GenerationError> {
    api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| GenerationError::MissingCredential {
            var_name: API_KEY_VAR.to_string(),
        })
}

/// 凭证类错误的代码（小写比较）
///
/// 覆盖 OpenAI、Gemini 以及豆包等兼容服务使用的 `code` / `type` / `status` 取值。
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "invalid_api_key",
    "api_key_invalid",
    "permission_denied",
    "unauthenticated",
    "unauthorized",
    "authenticationerror",
    "authentication_error",
];

/// 判断服务端错误是否属于凭证被拒绝
pub(crate) fn is_credential_rejection(status: Option<u16>, code: Option<&str>, message: &str) -> bool {
    if matches!(status, Some(401) | Some(403)) {
        return true;
    }

    if let Some(code) = code {
        if CREDENTIAL_ERROR_CODES.contains(&code.to_lowercase().as_str()) {
            return true;
        }
    }

    let message = message.to_lowercase();
    (message.contains("api key") && (message.contains("invalid") || message.contains("not valid")))
        || message.contains("api_key_invalid")
        || message.contains("incorrect api key")
        || message.contains("unauthorized")
        || message.contains("authentication")
}
