//! 工作表相关的数据结构

use std::collections::HashMap;

use crate::error::GenerationError;
use crate::models::exercise::{ExerciseContent, ExerciseTypeId};

/// 工作表固定标题
pub const WORKSHEET_TITLE: &str = "工作表";

/// 单个练习的生成结果
pub type GenerationOutcome = Result<ExerciseContent, GenerationError>;

/// 工作表中的一个练习槽位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedExercise {
    pub exercise_type: ExerciseTypeId,
    pub outcome: GenerationOutcome,
}

impl GeneratedExercise {
    pub fn content(&self) -> Option<&ExerciseContent> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&GenerationError> {
        self.outcome.as_ref().err()
    }

    /// 如果该槽位是凭证类错误则返回它
    pub fn fatal_error(&self) -> Option<&GenerationError> {
        self.error().filter(|e| e.is_fatal())
    }
}

/// 一次生成的完整结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetResult {
    pub original_text: String,
    pub title: String,
    /// 与选择顺序一致
    pub exercises: Vec<GeneratedExercise>,
}

impl WorksheetResult {
    pub fn success_count(&self) -> usize {
        self.exercises.iter().filter(|e| e.outcome.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.exercises.len() - self.success_count()
    }
}

/// 练习勾选状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: HashMap<ExerciseTypeId, bool>,
}

impl SelectionState {
    /// 全部不选
    pub fn none() -> Self {
        Self {
            selected: ExerciseTypeId::ALL.iter().map(|&id| (id, false)).collect(),
        }
    }

    /// 只选中给定的类型
    pub fn only(ids: &[ExerciseTypeId]) -> Self {
        let mut state = Self::none();
        for &id in ids {
            state.set(id, true);
        }
        state
    }

    pub fn is_selected(&self, id: ExerciseTypeId) -> bool {
        self.selected.get(&id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: ExerciseTypeId, selected: bool) {
        self.selected.insert(id, selected);
    }

    pub fn toggle(&mut self, id: ExerciseTypeId) {
        let current = self.is_selected(id);
        self.set(id, !current);
    }

    /// 选中的类型，按注册表顺序
    pub fn selected_types(&self) -> Vec<ExerciseTypeId> {
        ExerciseTypeId::ALL
            .iter()
            .copied()
            .filter(|&id| self.is_selected(id))
            .collect()
    }
}

impl Default for SelectionState {
    /// 按注册表中的默认勾选状态初始化
    fn default() -> Self {
        Self {
            selected: ExerciseTypeId::ALL
                .iter()
                .map(|&id| (id, id.default_selected()))
                .collect(),
        }
    }
}
