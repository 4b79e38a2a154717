use std::path::PathBuf;

use anyhow::{Context, Result};
use worksheet_gen::utils::logging;
use worksheet_gen::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env().context("配置加载失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 第一个参数可以覆盖请求文件路径
    let input = std::env::args().nth(1).map(PathBuf::from);

    // 初始化并运行应用
    App::initialize(config)?.run(input.as_deref()).await?;

    Ok(())
}
