//! 应用入口 - 编排层
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写入日志文件头、根据配置创建生成服务
//! 2. **加载请求**：读取 TOML 格式的工作表请求
//! 3. **生成工作表**：委托 `WorksheetOrchestrator`
//! 4. **输出**：渲染为 Markdown 并写入文件，输出统计信息

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::clients::{backend_from_config, GenerationBackend};
use crate::config::Config;
use crate::error::FileError;
use crate::models::{load_worksheet_request, WorksheetResult};
use crate::orchestrator::WorksheetOrchestrator;
use crate::services::render_worksheet;
use crate::utils::logging::{init_log_file, log_startup, print_final_stats, truncate_text};

/// 应用主结构
pub struct App {
    config: Config,
    backend: Arc<dyn GenerationBackend>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let backend = backend_from_config(&config);
        Self::with_backend(config, backend)
    }

    /// 使用指定的生成服务初始化
    pub fn with_backend(config: Config, backend: Arc<dyn GenerationBackend>) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法初始化日志文件: {}", config.output_log_file))?;
        log_startup(&config);
        Ok(Self { config, backend })
    }

    /// 运行应用主逻辑
    ///
    /// `input` 为空时使用配置中的请求文件。
    pub async fn run(&self, input: Option<&Path>) -> Result<WorksheetResult> {
        let input = input.unwrap_or_else(|| Path::new(&self.config.input_file));
        info!("\n📁 正在加载工作表请求: {}", input.display());

        let request = load_worksheet_request(input)
            .await
            .with_context(|| format!("无法加载工作表请求: {}", input.display()))?;
        info!("原文: {}", truncate_text(request.text.trim(), 80));

        let mut orchestrator = WorksheetOrchestrator::new(Arc::clone(&self.backend));
        if let Some(title) = &request.title {
            orchestrator = orchestrator.with_title(title.clone());
        }

        let worksheet = orchestrator
            .generate_worksheet(&request.text, &request.exercises)
            .await
            .context("工作表生成失败")?;

        let rendered = render_worksheet(&worksheet);
        tokio::fs::write(&self.config.output_file, rendered)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.config.output_file.clone(),
                source,
            })
            .context("无法保存工作表")?;

        print_final_stats(
            worksheet.success_count(),
            worksheet.failure_count(),
            worksheet.exercises.len(),
            &self.config.output_file,
        );

        Ok(worksheet)
    }
}
