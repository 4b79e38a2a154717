use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::FileError;
use crate::models::exercise::ExerciseTypeId;
use crate::models::worksheet::SelectionState;

/// 一次工作表生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetRequest {
    /// 原文
    pub text: String,
    /// 自定义标题，为空时使用默认标题
    pub title: Option<String>,
    /// 选中的练习，保持文件中的顺序
    pub exercises: Vec<ExerciseTypeId>,
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    text: String,
    title: Option<String>,
    exercises: Option<Vec<String>>,
}

/// 解析 TOML 格式的请求
///
/// 未给出 `exercises` 时使用注册表中的默认勾选。
pub fn parse_worksheet_request(content: &str, path: &str) -> Result<WorksheetRequest, FileError> {
    let raw: RawRequest = toml::from_str(content).map_err(|source| FileError::TomlParseFailed {
        path: path.to_string(),
        source,
    })?;

    let exercises = match raw.exercises {
        Some(ids) => ids
            .iter()
            .map(|id| {
                ExerciseTypeId::from_id(id).ok_or_else(|| FileError::UnknownExerciseType {
                    path: path.to_string(),
                    id: id.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => SelectionState::default().selected_types(),
    };

    Ok(WorksheetRequest {
        text: raw.text,
        title: raw.title.filter(|t| !t.trim().is_empty()),
        exercises,
    })
}

/// 从 TOML 文件加载工作表请求
pub async fn load_worksheet_request(path: &Path) -> Result<WorksheetRequest, FileError> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path_str.clone(),
            source,
        })?;

    let request = parse_worksheet_request(&content, &path_str)?;
    info!(
        "已加载请求 {}: 原文 {} 字符, {} 种练习",
        path_str,
        request.text.chars().count(),
        request.exercises.len()
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_explicit_exercises() {
        let content = r#"
text = "Plant X is carnivorous."
title = "植物"
exercises = ["cloze-test", "chronological"]
"#;
        let request = parse_worksheet_request(content, "req.toml").unwrap();
        assert_eq!(request.text, "Plant X is carnivorous.");
        assert_eq!(request.title.as_deref(), Some("植物"));
        assert_eq!(
            request.exercises,
            vec![ExerciseTypeId::ClozeTest, ExerciseTypeId::Chronological]
        );
    }

    #[test]
    fn test_parse_defaults_to_registry_selection() {
        let request = parse_worksheet_request("text = \"abc\"\ntitle = \"  \"", "req.toml").unwrap();
        assert_eq!(request.title, None);
        assert_eq!(request.exercises, SelectionState::default().selected_types());
    }

    #[test]
    fn test_parse_rejects_unknown_exercise() {
        let err = parse_worksheet_request("text = \"abc\"\nexercises = [\"crossword\"]", "req.toml")
            .unwrap_err();
        assert!(matches!(err, FileError::UnknownExerciseType { ref id, .. } if id == "crossword"));
    }

    #[test]
    fn test_parse_rejects_missing_text() {
        let err = parse_worksheet_request("exercises = []", "req.toml").unwrap_err();
        assert!(matches!(err, FileError::TomlParseFailed { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let result = tokio_test::block_on(load_worksheet_request(Path::new(
            "definitely/not/here/worksheet.toml",
        )));
        assert!(matches!(result, Err(FileError::ReadFailed { .. })));
    }

    #[tokio::test]
    async fn test_load_existing_file() {
        let path = std::env::temp_dir().join(format!("worksheet_gen_loader_{}.toml", std::process::id()));
        std::fs::write(&path, "text = \"Plant X is carnivorous.\"\nexercises = [\"word_family\"]").unwrap();

        let request = load_worksheet_request(&path).await.unwrap();
        assert_eq!(request.text, "Plant X is carnivorous.");
        assert_eq!(request.exercises, vec![ExerciseTypeId::WordFamily]);

        let _ = std::fs::remove_file(path);
    }
}
