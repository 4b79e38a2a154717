//! 工作表编排器 - 编排层
//!
//! ## 职责
//!
//! 把"原文 + 选中的练习类型"变成一份完整的工作表，或者一个中止整次生成的错误。
//!
//! ## 流程
//!
//! 1. **本地校验**：原文为空白或没有选中练习时立即返回，不发出任何请求
//! 2. **并发分发**：每种练习一个 `tokio::spawn` 任务，任务之间没有共享可变状态
//! 3. **等待全部完成**：单一的 join 点，不设超时，不取消
//! 4. **汇总**：任一槽位是凭证类错误则整次中止，否则按选择顺序组装工作表
//!
//! 同一个编排器同一时间只允许一次生成，重入的调用直接返回 `RunInProgress`。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::clients::GenerationBackend;
use crate::error::{GenerationError, WorksheetError};
use crate::models::exercise::ExerciseTypeId;
use crate::models::worksheet::{
    GeneratedExercise, GenerationOutcome, SelectionState, WorksheetResult, WORKSHEET_TITLE,
};
use crate::services::ContentGenerator;

/// 工作表编排器
pub struct WorksheetOrchestrator {
    generator: Arc<ContentGenerator>,
    title: String,
    in_flight: AtomicBool,
}

impl WorksheetOrchestrator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            generator: Arc::new(ContentGenerator::new(backend)),
            title: WORKSHEET_TITLE.to_string(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// 使用自定义标题
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// 按勾选状态生成工作表（注册表顺序）
    pub async fn generate_from_selection(
        &self,
        source_text: &str,
        selection: &SelectionState,
    ) -> Result<WorksheetResult, WorksheetError> {
        self.generate_worksheet(source_text, &selection.selected_types())
            .await
    }

    /// 生成工作表
    ///
    /// 返回的练习顺序与 `selected_types` 一致，重复的类型只保留第一次出现。
    pub async fn generate_worksheet(
        &self,
        source_text: &str,
        selected_types: &[ExerciseTypeId],
    ) -> Result<WorksheetResult, WorksheetError> {
        // ========== 本地校验 ==========
        if source_text.trim().is_empty() {
            return Err(WorksheetError::BlankText);
        }
        let selected = dedup_preserving_order(selected_types);
        if selected.is_empty() {
            return Err(WorksheetError::NoExercisesSelected);
        }

        let _guard = RunGuard::acquire(&self.in_flight)?;

        info!("📝 开始生成工作表，共 {} 种练习", selected.len());

        // ========== 并发分发 ==========
        let text: Arc<str> = Arc::from(source_text);
        let handles: Vec<_> = selected
            .iter()
            .map(|&exercise_type| {
                let generator = Arc::clone(&self.generator);
                let text = Arc::clone(&text);
                tokio::spawn(async move {
                    debug!("[练习 {}] 🚀 开始生成", exercise_type);
                    generator.generate(exercise_type, &text).await
                })
            })
            .collect();

        // ========== 等待全部完成 ==========
        // join_all 保持输入顺序，第 i 个结果属于第 i 个任务
        let joined = join_all(handles).await;

        let exercises: Vec<GeneratedExercise> = selected
            .iter()
            .zip(joined)
            .map(|(&exercise_type, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    error!("[练习 {}] 任务执行失败: {}", exercise_type, e);
                    Err(GenerationError::transient(format!("生成任务异常终止: {}", e)))
                });
                log_outcome(exercise_type, &outcome);
                GeneratedExercise {
                    exercise_type,
                    outcome,
                }
            })
            .collect();

        // ========== 汇总 ==========
        if let Some(fatal) = exercises.iter().find_map(GeneratedExercise::fatal_error) {
            error!("❌ 凭证错误，中止本次生成: {}", fatal);
            return Err(WorksheetError::Fatal(fatal.clone()));
        }

        let worksheet = WorksheetResult {
            original_text: source_text.to_string(),
            title: self.title.clone(),
            exercises,
        };

        info!(
            "✓ 工作表生成完成: 成功 {}/{}",
            worksheet.success_count(),
            worksheet.exercises.len()
        );

        Ok(worksheet)
    }

    /// 当前是否有生成正在进行
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// 生成期间持有，释放时清除运行标记
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, WorksheetError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| {
                warn!("⚠️ 上一次生成尚未结束，拒绝新的请求");
                WorksheetError::RunInProgress
            })?;
        Ok(Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

fn dedup_preserving_order(types: &[ExerciseTypeId]) -> Vec<ExerciseTypeId> {
    let mut seen = Vec::with_capacity(types.len());
    for &t in types {
        if !seen.contains(&t) {
            seen.push(t);
        }
    }
    seen
}

fn log_outcome(exercise_type: ExerciseTypeId, outcome: &GenerationOutcome) {
    match outcome {
        Ok(_) => info!("[练习 {}] ✓ 生成成功", exercise_type),
        Err(e) if e.is_fatal() => error!("[练习 {}] ❌ {}", exercise_type, e),
        Err(e) => warn!("[练习 {}] ⚠️ 生成失败: {}", exercise_type, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::scripted::{valid_reply, ScriptedBackend};
    use crate::error::ErrorKind;
    use crate::models::exercise::{ClozeTestContent, ExerciseContent};
    use std::time::Duration;

    const TEXT: &str = "Plant X is carnivorous...";

    fn all_valid() -> ScriptedBackend {
        ExerciseTypeId::ALL
            .iter()
            .fold(ScriptedBackend::new(), |b, &t| b.reply(t, valid_reply(t)))
    }

    #[tokio::test]
    async fn test_results_follow_selection_order() {
        // 先选中的任务更慢，结果顺序仍然与选择顺序一致
        let backend = Arc::new(
            all_valid()
                .delay(ExerciseTypeId::WordFamily, Duration::from_millis(40))
                .delay(ExerciseTypeId::ClozeTest, Duration::from_millis(20)),
        );
        let orchestrator = WorksheetOrchestrator::new(backend.clone());
        let selection = [
            ExerciseTypeId::WordFamily,
            ExerciseTypeId::ClozeTest,
            ExerciseTypeId::Chronological,
        ];

        let worksheet = orchestrator.generate_worksheet(TEXT, &selection).await.unwrap();

        let order: Vec<_> = worksheet.exercises.iter().map(|e| e.exercise_type).collect();
        assert_eq!(order, selection.to_vec());
        assert_eq!(worksheet.success_count(), 3);
        assert_eq!(worksheet.original_text, TEXT);
        assert_eq!(worksheet.title, WORKSHEET_TITLE);
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_blank_text_makes_no_calls() {
        let backend = Arc::new(all_valid());
        let orchestrator = WorksheetOrchestrator::new(backend.clone());

        for text in ["", "   ", "\n\t "] {
            let err = orchestrator
                .generate_worksheet(text, &[ExerciseTypeId::ClozeTest])
                .await
                .unwrap_err();
            assert_eq!(err, WorksheetError::BlankText);
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_calls() {
        let backend = Arc::new(all_valid());
        let orchestrator = WorksheetOrchestrator::new(backend.clone());

        let err = orchestrator.generate_worksheet(TEXT, &[]).await.unwrap_err();
        assert_eq!(err, WorksheetError::NoExercisesSelected);

        let err = orchestrator
            .generate_from_selection(TEXT, &SelectionState::none())
            .await
            .unwrap_err();
        assert_eq!(err, WorksheetError::NoExercisesSelected);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_credential_error_aborts_whole_run() {
        let backend = Arc::new(all_valid().fail(
            ExerciseTypeId::JumbledSentence,
            GenerationError::InvalidCredential {
                message: "API key not valid".to_string(),
            },
        ));
        let orchestrator = WorksheetOrchestrator::new(backend.clone());

        let err = orchestrator
            .generate_from_selection(TEXT, &SelectionState::default())
            .await
            .unwrap_err();

        match err {
            WorksheetError::Fatal(e) => assert_eq!(e.kind(), ErrorKind::InvalidCredential),
            other => panic!("期望凭证错误，实际: {:?}", other),
        }
        // 其余任务照常执行完毕，只是结果被丢弃
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_single_fatal_error_surfaced_when_several() {
        let backend = Arc::new(
            all_valid()
                .fail(
                    ExerciseTypeId::Chronological,
                    GenerationError::MissingCredential {
                        var_name: "API_KEY".to_string(),
                    },
                )
                .fail(
                    ExerciseTypeId::WordFamily,
                    GenerationError::InvalidCredential {
                        message: "denied".to_string(),
                    },
                ),
        );
        let orchestrator = WorksheetOrchestrator::new(backend);

        let err = orchestrator
            .generate_worksheet(TEXT, &ExerciseTypeId::ALL)
            .await
            .unwrap_err();
        match err {
            WorksheetError::Fatal(e) => assert!(e.is_fatal()),
            other => panic!("期望凭证错误，实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_fatal_failures_stay_in_their_slot() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .reply(
                    ExerciseTypeId::Chronological,
                    valid_reply(ExerciseTypeId::Chronological),
                )
                .reply(ExerciseTypeId::ClozeTest, r#"{"title": "填空"}"#)
                .fail(ExerciseTypeId::WordFamily, GenerationError::transient("503")),
        );
        let orchestrator = WorksheetOrchestrator::new(backend);

        let worksheet = orchestrator
            .generate_worksheet(
                TEXT,
                &[
                    ExerciseTypeId::Chronological,
                    ExerciseTypeId::ClozeTest,
                    ExerciseTypeId::JumbledSentence,
                    ExerciseTypeId::WordFamily,
                ],
            )
            .await
            .unwrap();

        let kinds: Vec<_> = worksheet
            .exercises
            .iter()
            .map(|e| e.error().map(GenerationError::kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(ErrorKind::MalformedResponse),
                Some(ErrorKind::EmptyResponse),
                Some(ErrorKind::TransientService),
            ]
        );
        assert_eq!(worksheet.success_count(), 1);
        assert_eq!(worksheet.failure_count(), 3);
    }

    #[tokio::test]
    async fn test_cloze_example() {
        let backend = Arc::new(ScriptedBackend::new().reply(
            ExerciseTypeId::ClozeTest,
            r#"{"title": "完形填空", "instruction": "请补全", "text_with_blanks": "Plant X is ___..."}"#,
        ));
        let orchestrator = WorksheetOrchestrator::new(backend);

        let worksheet = orchestrator
            .generate_worksheet(TEXT, &[ExerciseTypeId::ClozeTest])
            .await
            .unwrap();

        assert_eq!(worksheet.exercises.len(), 1);
        assert_eq!(
            worksheet.exercises[0].content(),
            Some(&ExerciseContent::ClozeTest(ClozeTestContent {
                title: "完形填空".to_string(),
                instruction: "请补全".to_string(),
                text_with_blanks: "Plant X is ___...".to_string(),
            }))
        );
    }

    #[tokio::test]
    async fn test_duplicate_selection_is_collapsed() {
        let backend = Arc::new(all_valid());
        let orchestrator = WorksheetOrchestrator::new(backend.clone()).with_title("植物");

        let worksheet = orchestrator
            .generate_worksheet(
                TEXT,
                &[
                    ExerciseTypeId::ClozeTest,
                    ExerciseTypeId::Chronological,
                    ExerciseTypeId::ClozeTest,
                ],
            )
            .await
            .unwrap();

        assert_eq!(worksheet.exercises.len(), 2);
        assert_eq!(worksheet.title, "植物");
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_run_is_rejected() {
        let backend = Arc::new(all_valid().delay(ExerciseTypeId::ClozeTest, Duration::from_millis(100)));
        let orchestrator = Arc::new(WorksheetOrchestrator::new(backend.clone()));

        let first = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                orchestrator
                    .generate_worksheet(TEXT, &[ExerciseTypeId::ClozeTest])
                    .await
            })
        };

        // 等第一次生成进入分发阶段
        while !orchestrator.is_running() {
            tokio::task::yield_now().await;
        }

        let err = orchestrator
            .generate_worksheet(TEXT, &[ExerciseTypeId::Chronological])
            .await
            .unwrap_err();
        assert_eq!(err, WorksheetError::RunInProgress);

        assert!(first.await.unwrap().is_ok());
        assert!(!orchestrator.is_running());
        assert_eq!(backend.calls(), 1);

        // 结束后可以再次生成
        assert!(orchestrator
            .generate_worksheet(TEXT, &[ExerciseTypeId::Chronological])
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_guard_released_after_fatal_error() {
        let backend = Arc::new(ScriptedBackend::new().fail(
            ExerciseTypeId::ClozeTest,
            GenerationError::MissingCredential {
                var_name: "API_KEY".to_string(),
            },
        ));
        let orchestrator = WorksheetOrchestrator::new(backend);

        assert!(orchestrator
            .generate_worksheet(TEXT, &[ExerciseTypeId::ClozeTest])
            .await
            .is_err());
        assert!(!orchestrator.is_running());
    }
}
