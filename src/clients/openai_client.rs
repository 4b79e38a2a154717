//! OpenAI 兼容客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Doubao 等）
//!
//! Chat Completions 接口没有统一的结构约束参数，响应结构以 JSON 示例的形式
//! 写在提示词里，返回内容由上层负责校验。
//!
//! `async-openai` 默认会对 5xx 和 429 做指数退避重试，这里把退避时长设为 0，
//! 每次生成只发出一次请求，失败直接交给上层分类。

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tracing::{debug, warn};

use crate::clients::{is_credential_rejection, require_api_key, GenerationBackend, GenerationRequest};
use crate::config::Config;
use crate::error::GenerationError;

/// OpenAI 兼容的生成服务
pub struct OpenAiBackend {
    client: Option<Client<OpenAIConfig>>,
    api_key: Option<String>,
    model_name: String,
    temperature: f32,
}

impl OpenAiBackend {
    pub fn new(config: &Config) -> Self {
        // 未配置密钥时不创建客户端，调用时直接返回凭证缺失
        let client = config.llm_api_key.as_ref().map(|key| {
            let openai_config = OpenAIConfig::new()
                .with_api_key(key)
                .with_api_base(config.api_base_url());
            let no_retry = ExponentialBackoffBuilder::new()
                .with_max_elapsed_time(Some(Duration::ZERO))
                .build();
            Client::with_config(openai_config).with_backoff(no_retry)
        });

        Self {
            client,
            api_key: config.llm_api_key.clone(),
            model_name: config.model_name().to_string(),
            temperature: config.llm_temperature,
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        require_api_key(self.api_key.as_deref())?;
        let client = self.client.as_ref().ok_or_else(|| GenerationError::MissingCredential {
            var_name: crate::config::API_KEY_VAR.to_string(),
        })?;

        debug!(
            "[练习 {}] 调用 Chat Completions，模型: {}",
            request.exercise_type, self.model_name
        );

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_prompt.as_str())
            .build()
            .map_err(|e| GenerationError::transient(format!("构建系统消息失败: {}", e)))?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_prompt.as_str())
            .build()
            .map_err(|e| GenerationError::transient(format!("构建用户消息失败: {}", e)))?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| GenerationError::transient(format!("构建请求失败: {}", e)))?;

        let response = client.chat().create(chat_request).await.map_err(|e| {
            warn!("[练习 {}] LLM API 调用失败: {}", request.exercise_type, e);
            classify_openai_error(e)
        })?;

        debug!("[练习 {}] LLM API 调用成功", request.exercise_type);

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::empty(request.exercise_type))
    }
}

/// 将 `async-openai` 的错误映射到生成错误分类
///
/// `ApiError` 不带 HTTP 状态码，只能看 `code` / `type` / `message`；
/// 兼容服务的错误体不是 OpenAI 格式时会变成 `JSONDeserialize`，原始响应体在第二个字段里。
fn classify_openai_error(err: OpenAIError) -> GenerationError {
    match err {
        OpenAIError::ApiError(api) => {
            let rejected = [api.code.as_deref(), api.r#type.as_deref()]
                .into_iter()
                .any(|code| is_credential_rejection(None, code, &api.message));
            if rejected {
                GenerationError::InvalidCredential {
                    message: api.message,
                }
            } else {
                GenerationError::transient(api.message)
            }
        }
        OpenAIError::Reqwest(e) => {
            let status = e.status().map(|s| s.as_u16());
            classify_api_failure(status, None, &e.to_string())
        }
        OpenAIError::JSONDeserialize(e, content) => {
            if is_credential_rejection(None, None, &content) {
                GenerationError::InvalidCredential {
                    message: content.trim().to_string(),
                }
            } else {
                GenerationError::transient(format!("无法解析响应: {} ({})", e, content.trim()))
            }
        }
        other => GenerationError::transient(other.to_string()),
    }
}

fn classify_api_failure(status: Option<u16>, code: Option<&str>, message: &str) -> GenerationError {
    if is_credential_rejection(status, code, message) {
        GenerationError::InvalidCredential {
            message: message.to_string(),
        }
    } else {
        GenerationError::transient(message.to_string())
    }
}
