//! 各练习类型的提示词

use crate::models::exercise::ExerciseTypeId;

pub const SYSTEM_PROMPT: &str = "你是一名经验丰富的语言教师，擅长根据阅读材料编写课堂练习。\
                                 练习必须完全基于给定的原文，使用与原文相同的语言书写，\
                                 并且只输出一个 JSON 对象，不要输出任何解释或 Markdown。";

/// 各类型的出题要求
fn task_description(exercise_type: ExerciseTypeId) -> &'static str {
    match exercise_type {
        ExerciseTypeId::Chronological => {
            "编写一道时间顺序排列题：从原文中提取 4 到 6 个按时间或逻辑先后发生的事件，\
             每个事件写成一个完整的句子，然后打乱顺序放入 sentences。\
             instruction 要求学生按正确顺序为句子编号。"
        }
        ExerciseTypeId::JumbledSentence => {
            "编写一道句子词序重排题：从原文中选出 4 到 5 个句子，把每个句子的词语顺序打乱，\
             词语之间用 \" / \" 分隔，放入 jumbled_sentences。\
             instruction 要求学生把词语排成正确的句子。"
        }
        ExerciseTypeId::ClozeTest => {
            "编写一道完形填空题：选取原文中的一段（或全文），挖去 6 到 10 个关键词，\
             每个空用 ___ 表示，结果放入 text_with_blanks。\
             instruction 要求学生根据原文补全空格。"
        }
        ExerciseTypeId::WordFamily => {
            "编写一道词族练习：从原文中选出 2 到 3 个词根，列出同一词族的不同词形放入 word_bank，\
             再编写 4 到 6 个需要用 word_bank 中的词填空的句子放入 questions，每个空用 ___ 表示。\
             instruction 要求学生从词库中选择正确的词形填空。"
        }
    }
}

/// 构建用户消息
pub fn build_user_prompt(exercise_type: ExerciseTypeId, source_text: &str) -> String {
    let schema = exercise_type.schema();
    format!(
        r#"{}

原文：
"""
{}
"""

请严格按照下面的 JSON 结构返回，所有字段都必须填写：
{}"#,
        task_description(exercise_type),
        source_text.trim(),
        schema.shape_hint()
    )
}
