//! # Worksheet Gen
//!
//! 根据一段阅读材料，用大模型生成练习并排版成可打印的工作表
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 只负责和外部生成服务通信
//! - `GeminiBackend` - Gemini `generateContent`，带响应结构约束
//! - `OpenAiBackend` - 兼容 OpenAI 的 Chat Completions 服务
//!
//! ### ② 数据层（Models）
//! - `models/` - 练习类型注册表、练习内容结构、工作表结果、请求文件加载
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个练习
//! - `ContentGenerator` - 生成一种练习并校验结构
//! - `worksheet_renderer` - 渲染 Markdown 工作表
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/worksheet_orchestrator` - 并发生成所有选中的练习并汇总
//! - `orchestrator/app` - 应用入口，加载请求、写出结果
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{GenerationBackend, GenerationRequest};
pub use config::Config;
pub use error::{ConfigError, ErrorKind, FileError, GenerationError, WorksheetError};
pub use models::{
    list_exercise_types, ExerciseContent, ExerciseTypeId, ExerciseTypeInfo, GeneratedExercise,
    SelectionState, WorksheetResult,
};
pub use orchestrator::{App, WorksheetOrchestrator};
pub use services::{render_worksheet, ContentGenerator};
