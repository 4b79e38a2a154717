//! 测试用的生成服务：按练习类型返回预设结果，并记录调用次数

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::{GenerationBackend, GenerationRequest};
use crate::error::GenerationError;
use crate::models::exercise::ExerciseTypeId;

#[derive(Default)]
pub struct ScriptedBackend {
    replies: HashMap<ExerciseTypeId, Result<String, GenerationError>>,
    delays: HashMap<ExerciseTypeId, Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, exercise_type: ExerciseTypeId, body: impl Into<String>) -> Self {
        self.replies.insert(exercise_type, Ok(body.into()));
        self
    }

    pub fn fail(mut self, exercise_type: ExerciseTypeId, err: GenerationError) -> Self {
        self.replies.insert(exercise_type, Err(err));
        self
    }

    pub fn delay(mut self, exercise_type: ExerciseTypeId, delay: Duration) -> Self {
        self.delays.insert(exercise_type, delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(delay) = self.delays.get(&request.exercise_type) {
            tokio::time::sleep(*delay).await;
        }
        self.replies
            .get(&request.exercise_type)
            .cloned()
            .unwrap_or_else(|| Err(GenerationError::empty(request.exercise_type)))
    }
}

/// 各类型的合法返回示例
pub fn valid_reply(exercise_type: ExerciseTypeId) -> String {
    let value = match exercise_type {
        ExerciseTypeId::Chronological => serde_json::json!({
            "title": "事件排序",
            "instruction": "请按发生顺序为句子编号。",
            "sentences": ["The plant traps an insect.", "The seed sprouts."]
        }),
        ExerciseTypeId::JumbledSentence => serde_json::json!({
            "title": "连词成句",
            "instruction": "请把词语排成正确的句子。",
            "jumbled_sentences": ["carnivorous / is / Plant X"]
        }),
        ExerciseTypeId::ClozeTest => serde_json::json!({
            "title": "完形填空",
            "instruction": "请根据原文补全空格。",
            "text_with_blanks": "Plant X is ___..."
        }),
        ExerciseTypeId::WordFamily => serde_json::json!({
            "title": "词族",
            "instruction": "请从词库中选择正确的词形。",
            "word_bank": ["carnivore", "carnivorous"],
            "questions": ["Plant X is a ___ plant."]
        }),
    };
    value.to_string()
}
