//! 工作表渲染 - 业务能力层
//!
//! 把生成结果渲染成可打印的 Markdown 文档：原文在前，练习按选择顺序排列。
//! 生成失败的练习在原位置显示一行错误信息，没有收到内容时只显示"未收到"提示。

use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::error::GenerationError;
use crate::models::exercise::ExerciseContent;
use crate::models::worksheet::{GeneratedExercise, WorksheetResult};

pub const ORIGINAL_TEXT_TITLE: &str = "原文";
pub const ERROR_GENERATING_EXERCISE: &str = "生成练习失败：";

/// 渲染工作表（使用当前时间作为生成日期）
pub fn render_worksheet(worksheet: &WorksheetResult) -> String {
    render_worksheet_at(worksheet, Local::now())
}

/// 渲染工作表
pub fn render_worksheet_at(worksheet: &WorksheetResult, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}", worksheet.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "姓名：__________　　日期：{}", generated_at.format("%Y-%m-%d"));
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", ORIGINAL_TEXT_TITLE);
    let _ = writeln!(out);
    for paragraph in worksheet.original_text.trim().lines() {
        let _ = writeln!(out, "> {}", paragraph);
    }

    for (index, exercise) in worksheet.exercises.iter().enumerate() {
        let _ = writeln!(out);
        render_exercise(&mut out, index + 1, exercise);
    }

    out
}

fn render_exercise(out: &mut String, number: usize, exercise: &GeneratedExercise) {
    let content = match &exercise.outcome {
        Ok(content) => content,
        Err(e @ GenerationError::EmptyResponse { .. }) => {
            let _ = writeln!(out, "## {}. {}", number, exercise.exercise_type.label());
            let _ = writeln!(out);
            let _ = writeln!(out, "*{}*", e);
            return;
        }
        Err(e) => {
            let _ = writeln!(out, "## {}. {}", number, exercise.exercise_type.label());
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "**{}{}。** {}",
                ERROR_GENERATING_EXERCISE,
                exercise.exercise_type.label(),
                e
            );
            return;
        }
    };

    let _ = writeln!(out, "## {}. {}", number, content.title());
    let _ = writeln!(out);
    let _ = writeln!(out, "*{}*", content.instruction());
    let _ = writeln!(out);

    match content {
        ExerciseContent::Chronological(c) => {
            for sentence in &c.sentences {
                let _ = writeln!(out, "- [ ] ____ {}", sentence);
            }
        }
        ExerciseContent::JumbledSentence(c) => {
            for (i, sentence) in c.jumbled_sentences.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, sentence);
                let _ = writeln!(out);
                let _ = writeln!(out, "   ______________________________");
            }
        }
        ExerciseContent::ClozeTest(c) => {
            for line in c.text_with_blanks.trim().lines() {
                let _ = writeln!(out, "{}", line);
            }
        }
        ExerciseContent::WordFamily(c) => {
            let _ = writeln!(out, "**词库：** {}", c.word_bank.join(" · "));
            let _ = writeln!(out);
            for (i, question) in c.questions.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, question);
            }
        }
    }
}
