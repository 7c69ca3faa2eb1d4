use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 采样温度，识别任务需要尽量稳定
    pub llm_temperature: f32,
    /// 单次回复的最大 token 数（30 道题的 JSON 约 1k token）
    pub llm_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.0,
            llm_max_tokens: 2048,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: parse_env("LLM_TEMPERATURE", "f32")?.unwrap_or(default.llm_temperature),
            llm_max_tokens: parse_env("LLM_MAX_TOKENS", "u32")?.unwrap_or(default.llm_max_tokens),
        })
    }
}

/// 读取并解析环境变量，未设置时返回 `None`
fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
