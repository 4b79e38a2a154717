//! 练习内容生成服务 - 业务能力层
//!
//! 只负责"为一种练习类型生成一份内容"，不关心有几种练习被选中、
//! 也不决定错误是否中止整次生成。
//!
//! 流程：构建提示词 → 调用生成服务（一次） → 解析 JSON → 结构校验 → 转换为练习内容

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::clients::{GenerationBackend, GenerationRequest};
use crate::error::GenerationError;
use crate::models::exercise::{ExerciseContent, ExerciseTypeId};
use crate::models::worksheet::GenerationOutcome;
use crate::services::prompts::{build_user_prompt, SYSTEM_PROMPT};
use crate::utils::logging::truncate_text;

/// 练习内容生成服务
///
/// 不持有任何可变状态，可以被多个并发任务共享。
pub struct ContentGenerator {
    backend: Arc<dyn GenerationBackend>,
}

impl ContentGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// 构建发给生成服务的请求
    pub fn build_request(&self, exercise_type: ExerciseTypeId, source_text: &str) -> GenerationRequest {
        GenerationRequest {
            exercise_type,
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(exercise_type, source_text),
            response_schema: exercise_type.schema().to_response_schema(),
        }
    }

    /// 为一种练习类型生成内容
    ///
    /// `source_text` 必须非空，由调用方保证。失败不会重试。
    pub async fn generate(&self, exercise_type: ExerciseTypeId, source_text: &str) -> GenerationOutcome {
        let request = self.build_request(exercise_type, source_text);
        let raw = self.backend.generate(&request).await?;

        debug!(
            "[练习 {}] 收到响应: {}",
            exercise_type,
            truncate_text(&raw, 120)
        );

        parse_content(exercise_type, &raw).map_err(|e| {
            warn!("[练习 {}] ⚠️ {}", exercise_type, e);
            e
        })
    }
}

/// 解析并校验模型输出
pub fn parse_content(exercise_type: ExerciseTypeId, raw: &str) -> GenerationOutcome {
    let json_text = strip_code_fence(raw);
    if json_text.is_empty() {
        return Err(GenerationError::empty(exercise_type));
    }

    let value: serde_json::Value = serde_json::from_str(json_text)
        .map_err(|e| GenerationError::malformed(exercise_type, format!("不是合法的 JSON: {}", e)))?;

    exercise_type
        .schema()
        .validate(&value)
        .map_err(|reason| GenerationError::malformed(exercise_type, reason))?;

    ExerciseContent::from_value(exercise_type, value)
        .map_err(|e| GenerationError::malformed(exercise_type, e.to_string()))
}

/// 去掉模型有时会包裹的 ```json 代码块
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match Regex::new(r"(?s)^```[A-Za-z]*\s*\n?(.*?)\n?\s*```$") {
        Ok(fence) => fence
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(trimmed),
        Err(_) => trimmed,
    }
}
