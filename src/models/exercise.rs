//! 练习类型与练习内容
//!
//! 练习类型是一个封闭集合，每种类型对应一种固定的内容结构。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 练习类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseTypeId {
    /// 时间顺序排列
    #[serde(alias = "chronological-order")]
    Chronological,
    /// 打乱词序的句子
    #[serde(alias = "jumbled-sentence")]
    JumbledSentence,
    /// 完形填空
    #[serde(alias = "cloze-test")]
    ClozeTest,
    /// 词族练习
    #[serde(alias = "word-family")]
    WordFamily,
}

/// 字符串到练习类型的静态映射（包含别名）
static EXERCISE_IDS: phf::Map<&'static str, ExerciseTypeId> = phf::phf_map! {
    "chronological" => ExerciseTypeId::Chronological,
    "chronological-order" => ExerciseTypeId::Chronological,
    "jumbled_sentence" => ExerciseTypeId::JumbledSentence,
    "jumbled-sentence" => ExerciseTypeId::JumbledSentence,
    "cloze_test" => ExerciseTypeId::ClozeTest,
    "cloze-test" => ExerciseTypeId::ClozeTest,
    "word_family" => ExerciseTypeId::WordFamily,
    "word-family" => ExerciseTypeId::WordFamily,
};

impl ExerciseTypeId {
    /// 所有练习类型，按注册表顺序排列
    pub const ALL: [ExerciseTypeId; 4] = [
        ExerciseTypeId::Chronological,
        ExerciseTypeId::JumbledSentence,
        ExerciseTypeId::ClozeTest,
        ExerciseTypeId::WordFamily,
    ];

    /// 获取标准标识符
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseTypeId::Chronological => "chronological",
            ExerciseTypeId::JumbledSentence => "jumbled_sentence",
            ExerciseTypeId::ClozeTest => "cloze_test",
            ExerciseTypeId::WordFamily => "word_family",
        }
    }

    /// 从标识符解析练习类型（忽略大小写和首尾空白，支持连字符别名）
    pub fn from_id(s: &str) -> Option<Self> {
        EXERCISE_IDS.get(s.trim().to_lowercase().as_str()).copied()
    }
}

impl fmt::Display for ExerciseTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 时间顺序排列练习
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChronologicalContent {
    pub title: String,
    pub instruction: String,
    pub sentences: Vec<String>,
}

/// 打乱词序练习
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JumbledSentenceContent {
    pub title: String,
    pub instruction: String,
    pub jumbled_sentences: Vec<String>,
}

/// 完形填空练习
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClozeTestContent {
    pub title: String,
    pub instruction: String,
    pub text_with_blanks: String,
}

/// 词族练习
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordFamilyContent {
    pub title: String,
    pub instruction: String,
    pub word_bank: Vec<String>,
    pub questions: Vec<String>,
}

/// 生成的练习内容
///
/// 变体与 [`ExerciseTypeId`] 一一对应。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseContent {
    Chronological(ChronologicalContent),
    JumbledSentence(JumbledSentenceContent),
    ClozeTest(ClozeTestContent),
    WordFamily(WordFamilyContent),
}

impl ExerciseContent {
    /// 内容所属的练习类型
    pub fn exercise_type(&self) -> ExerciseTypeId {
        match self {
            ExerciseContent::Chronological(_) => ExerciseTypeId::Chronological,
            ExerciseContent::JumbledSentence(_) => ExerciseTypeId::JumbledSentence,
            ExerciseContent::ClozeTest(_) => ExerciseTypeId::ClozeTest,
            ExerciseContent::WordFamily(_) => ExerciseTypeId::WordFamily,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ExerciseContent::Chronological(c) => &c.title,
            ExerciseContent::JumbledSentence(c) => &c.title,
            ExerciseContent::ClozeTest(c) => &c.title,
            ExerciseContent::WordFamily(c) => &c.title,
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            ExerciseContent::Chronological(c) => &c.instruction,
            ExerciseContent::JumbledSentence(c) => &c.instruction,
            ExerciseContent::ClozeTest(c) => &c.instruction,
            ExerciseContent::WordFamily(c) => &c.instruction,
        }
    }

    /// 将已通过结构校验的 JSON 转换为对应类型的内容
    pub fn from_value(
        exercise_type: ExerciseTypeId,
        value: serde_json::Value,
    ) -> serde_json::Result<Self> {
        Ok(match exercise_type {
            ExerciseTypeId::Chronological => {
                ExerciseContent::Chronological(serde_json::from_value(value)?)
            }
            ExerciseTypeId::JumbledSentence => {
                ExerciseContent::JumbledSentence(serde_json::from_value(value)?)
            }
            ExerciseTypeId::ClozeTest => ExerciseContent::ClozeTest(serde_json::from_value(value)?),
            ExerciseTypeId::WordFamily => {
                ExerciseContent::WordFamily(serde_json::from_value(value)?)
            }
        })
    }
}
