//! 练习类型注册表
//!
//! 静态数据：每种练习类型的显示名称、默认勾选状态，以及生成内容必须满足的结构。

use regex::Regex;
use serde_json::{json, Map, Value as JsonValue};

use crate::models::exercise::ExerciseTypeId;

/// 练习类型的显示信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseTypeInfo {
    pub id: ExerciseTypeId,
    pub label: &'static str,
    pub default_selected: bool,
}

static EXERCISE_TYPES: [ExerciseTypeInfo; 4] = [
    ExerciseTypeInfo {
        id: ExerciseTypeId::Chronological,
        label: "时间顺序排列练习",
        default_selected: true,
    },
    ExerciseTypeInfo {
        id: ExerciseTypeId::JumbledSentence,
        label: "句子词序重排练习",
        default_selected: true,
    },
    ExerciseTypeInfo {
        id: ExerciseTypeId::ClozeTest,
        label: "完形填空练习 (Cloze)",
        default_selected: true,
    },
    ExerciseTypeInfo {
        id: ExerciseTypeId::WordFamily,
        label: "词族练习",
        default_selected: false,
    },
];

/// 列出所有练习类型（注册表顺序）
pub fn list_exercise_types() -> &'static [ExerciseTypeInfo] {
    &EXERCISE_TYPES
}

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 非空字符串
    Text,
    /// 非空字符串，且至少包含一个填空标记（两个以上连续下划线）
    BlankedText,
    /// 非空字符串数组
    TextList,
}

/// 结构中的单个必填字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// 练习内容结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseSchema {
    pub exercise_type: ExerciseTypeId,
    pub fields: &'static [SchemaField],
}

const TITLE: SchemaField = SchemaField {
    name: "title",
    kind: FieldKind::Text,
    description: "练习标题",
};

const INSTRUCTION: SchemaField = SchemaField {
    name: "instruction",
    kind: FieldKind::Text,
    description: "给学生的作答说明",
};

const CHRONOLOGICAL_FIELDS: [SchemaField; 3] = [
    TITLE,
    INSTRUCTION,
    SchemaField {
        name: "sentences",
        kind: FieldKind::TextList,
        description: "描述原文事件的句子，顺序已打乱",
    },
];

const JUMBLED_SENTENCE_FIELDS: [SchemaField; 3] = [
    TITLE,
    INSTRUCTION,
    SchemaField {
        name: "jumbled_sentences",
        kind: FieldKind::TextList,
        description: "词序被打乱的句子，词与词之间用 / 分隔",
    },
];

const CLOZE_TEST_FIELDS: [SchemaField; 3] = [
    TITLE,
    INSTRUCTION,
    SchemaField {
        name: "text_with_blanks",
        kind: FieldKind::BlankedText,
        description: "挖去关键词后的文本，每个空用 ___ 表示",
    },
];

const WORD_FAMILY_FIELDS: [SchemaField; 4] = [
    TITLE,
    INSTRUCTION,
    SchemaField {
        name: "word_bank",
        kind: FieldKind::TextList,
        description: "同一词族的词语",
    },
    SchemaField {
        name: "questions",
        kind: FieldKind::TextList,
        description: "需要用词库中的词填空的句子",
    },
];

impl ExerciseTypeId {
    /// 获取注册表中的显示信息
    pub fn info(self) -> &'static ExerciseTypeInfo {
        match self {
            ExerciseTypeId::Chronological => &EXERCISE_TYPES[0],
            ExerciseTypeId::JumbledSentence => &EXERCISE_TYPES[1],
            ExerciseTypeId::ClozeTest => &EXERCISE_TYPES[2],
            ExerciseTypeId::WordFamily => &EXERCISE_TYPES[3],
        }
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn default_selected(self) -> bool {
        self.info().default_selected
    }

    /// 获取该类型生成内容的结构
    pub fn schema(self) -> ExerciseSchema {
        let fields: &'static [SchemaField] = match self {
            ExerciseTypeId::Chronological => &CHRONOLOGICAL_FIELDS,
            ExerciseTypeId::JumbledSentence => &JUMBLED_SENTENCE_FIELDS,
            ExerciseTypeId::ClozeTest => &CLOZE_TEST_FIELDS,
            ExerciseTypeId::WordFamily => &WORD_FAMILY_FIELDS,
        };
        ExerciseSchema {
            exercise_type: self,
            fields,
        }
    }
}

impl ExerciseSchema {
    /// 校验 JSON 对象是否满足结构
    ///
    /// 只检查必填字段及其形状，不检查内容本身是否合理。
    /// 失败时返回可读的原因。
    pub fn validate(&self, value: &JsonValue) -> Result<(), String> {
        let object = value
            .as_object()
            .ok_or_else(|| "返回内容不是 JSON 对象".to_string())?;

        for field in self.fields {
            let field_value = object
                .get(field.name)
                .ok_or_else(|| format!("缺少字段 `{}`", field.name))?;

            match field.kind {
                FieldKind::Text => {
                    check_text(field.name, field_value)?;
                }
                FieldKind::BlankedText => {
                    let text = check_text(field.name, field_value)?;
                    let blank = Regex::new(r"_{2,}").map_err(|e| e.to_string())?;
                    if !blank.is_match(text) {
                        return Err(format!("字段 `{}` 中没有填空标记", field.name));
                    }
                }
                FieldKind::TextList => {
                    let items = field_value
                        .as_array()
                        .ok_or_else(|| format!("字段 `{}` 应为字符串数组", field.name))?;
                    if items.is_empty() {
                        return Err(format!("字段 `{}` 不能为空数组", field.name));
                    }
                    for (i, item) in items.iter().enumerate() {
                        check_text(&format!("{}[{}]", field.name, i), item)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// 生成服务使用的响应结构描述（OpenAPI 子集，Gemini `responseSchema` 格式）
    pub fn to_response_schema(&self) -> JsonValue {
        let mut properties = Map::new();
        for field in self.fields {
            let property = match field.kind {
                FieldKind::Text | FieldKind::BlankedText => json!({
                    "type": "STRING",
                    "description": field.description,
                }),
                FieldKind::TextList => json!({
                    "type": "ARRAY",
                    "description": field.description,
                    "items": { "type": "STRING" },
                }),
            };
            properties.insert(field.name.to_string(), property);
        }

        let required: Vec<&str> = self.fields.iter().map(|f| f.name).collect();

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
            "propertyOrdering": required,
        })
    }

    /// 提示词中使用的 JSON 示例
    pub fn shape_hint(&self) -> String {
        let mut example = Map::new();
        for field in self.fields {
            let placeholder = match field.kind {
                FieldKind::Text | FieldKind::BlankedText => json!(field.description),
                FieldKind::TextList => json!([field.description, "..."]),
            };
            example.insert(field.name.to_string(), placeholder);
        }
        serde_json::to_string_pretty(&JsonValue::Object(example)).unwrap_or_default()
    }
}

fn check_text<'a>(name: &str, value: &'a JsonValue) -> Result<&'a str, String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!("字段 `{}` 应为字符串", name))?;
    if text.trim().is_empty() {
        return Err(format!("字段 `{}` 不能为空", name));
    }
    Ok(text)
}
