//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 加载请求、写出渲染后的工作表
//! - 输出统计信息
//!
//! ### `worksheet_orchestrator` - 工作表编排器
//! - 本地校验（原文、选择）
//! - 每种练习一个并发任务，等待全部完成
//! - 区分凭证类错误（中止）和单个练习的错误（保留在槽位中）
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一个请求文件)
//!     ↓
//! worksheet_orchestrator (处理 Vec<ExerciseTypeId>)
//!     ↓
//! services::ContentGenerator (处理单个练习)
//!     ↓
//! clients (基础设施：Gemini / OpenAI 兼容服务)
//! ```

pub mod app;
pub mod worksheet_orchestrator;

pub use app::App;
pub use worksheet_orchestrator::WorksheetOrchestrator;
