use std::str::FromStr;

use crate::error::ConfigError;

/// 存放 API 密钥的环境变量
pub const API_KEY_VAR: &str = "API_KEY";
/// 兼容旧配置的备用变量名
pub const FALLBACK_API_KEY_VAR: &str = "LLM_API_KEY";

/// 生成服务提供方
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    /// Google Gemini `generateContent` 接口
    Gemini,
    /// 兼容 OpenAI Chat Completions 的服务
    OpenAi,
}

impl Provider {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" | "openai-compatible" => Ok(Provider::OpenAi),
            other => Err(ConfigError::InvalidValue {
                name: "LLM_PROVIDER".to_string(),
                value: other.to_string(),
                reason: "可选值为 gemini 或 openai".to_string(),
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 生成服务配置 ---
    pub provider: Provider,
    /// API 密钥，未配置时所有生成请求都会以凭证缺失失败
    pub llm_api_key: Option<String>,
    /// 为空时使用提供方的默认地址
    pub llm_api_base_url: Option<String>,
    /// 为空时使用提供方的默认模型
    pub llm_model_name: Option<String>,
    pub llm_temperature: f32,
    // --- 输入输出 ---
    /// 工作表请求文件（TOML）
    pub input_file: String,
    /// 渲染后的工作表输出路径
    pub output_file: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            llm_api_key: None,
            llm_api_base_url: None,
            llm_model_name: None,
            llm_temperature: 0.7,
            input_file: "worksheet.toml".to_string(),
            output_file: "worksheet.md".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        let config = Self {
            provider: env_parse("LLM_PROVIDER", "gemini | openai")?.unwrap_or(default.provider),
            llm_api_key: non_empty_var(API_KEY_VAR).or_else(|| non_empty_var(FALLBACK_API_KEY_VAR)),
            llm_api_base_url: non_empty_var("LLM_API_BASE_URL"),
            llm_model_name: non_empty_var("LLM_MODEL_NAME"),
            llm_temperature: env_parse("LLM_TEMPERATURE", "f32")?.unwrap_or(default.llm_temperature),
            input_file: non_empty_var("WORKSHEET_INPUT").unwrap_or(default.input_file),
            output_file: non_empty_var("WORKSHEET_OUTPUT").unwrap_or(default.output_file),
            output_log_file: non_empty_var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
        };
        config.validate()?;
        Ok(config)
    }

    /// 检查取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::InvalidValue {
                name: "LLM_TEMPERATURE".to_string(),
                value: self.llm_temperature.to_string(),
                reason: "取值范围为 0.0 ~ 2.0".to_string(),
            });
        }
        if let Some(url) = &self.llm_api_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    name: "LLM_API_BASE_URL".to_string(),
                    value: url.clone(),
                    reason: "必须以 http:// 或 https:// 开头".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.llm_api_base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn model_name(&self) -> &str {
        self.llm_model_name
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match non_empty_var(name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
