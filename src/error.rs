use thiserror::Error;

use crate::models::exercise::ExerciseTypeId;

/// 生成错误的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingCredential,
    InvalidCredential,
    EmptyResponse,
    MalformedResponse,
    TransientService,
}

/// 单个练习的生成错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// 未配置 API 密钥
    #[error("未配置 API 密钥，请设置环境变量 {var_name}")]
    MissingCredential { var_name: String },
    /// API 密钥被服务拒绝
    #[error("API 密钥无效或没有权限: {message}")]
    InvalidCredential { message: String },
    /// 服务没有返回可用内容
    #[error("未收到 {label} 的内容")]
    EmptyResponse { label: String },
    /// 返回内容不符合结构
    #[error("{exercise} 的返回内容格式不正确: {reason}")]
    MalformedResponse {
        exercise: ExerciseTypeId,
        reason: String,
    },
    /// 其他服务错误（网络、配额等）
    #[error("生成服务出错: {message}")]
    TransientService { message: String },
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::MissingCredential { .. } => ErrorKind::MissingCredential,
            GenerationError::InvalidCredential { .. } => ErrorKind::InvalidCredential,
            GenerationError::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            GenerationError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            GenerationError::TransientService { .. } => ErrorKind::TransientService,
        }
    }

    /// 是否会中止整个生成过程
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MissingCredential | ErrorKind::InvalidCredential
        )
    }

    pub fn transient(message: impl Into<String>) -> Self {
        GenerationError::TransientService {
            message: message.into(),
        }
    }

    pub fn malformed(exercise: ExerciseTypeId, reason: impl Into<String>) -> Self {
        GenerationError::MalformedResponse {
            exercise,
            reason: reason.into(),
        }
    }

    pub fn empty(exercise: ExerciseTypeId) -> Self {
        GenerationError::EmptyResponse {
            label: exercise.label().to_string(),
        }
    }
}

/// 工作表生成的顶层错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorksheetError {
    /// 原文为空或只有空白
    #[error("请输入用于生成工作表的文本")]
    BlankText,
    /// 没有选择任何练习
    #[error("请至少选择一种练习")]
    NoExercisesSelected,
    /// 上一次生成尚未结束
    #[error("已有工作表正在生成，请稍后再试")]
    RunInProgress,
    /// 凭证类错误，整次生成被中止
    #[error("{0}")]
    Fatal(GenerationError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("未知的练习类型 `{id}` ({path})")]
    UnknownExerciseType { path: String, id: String },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 取值不在允许范围内
    #[error("配置项 {name} 的值 '{value}' 无效: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}
