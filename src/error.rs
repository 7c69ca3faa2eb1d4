use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 答题卡转写错误
    #[error("转写错误: {0}")]
    Transcription(#[from] TranscriptionError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 标准答案文件错误
    #[error("标准答案错误: {0}")]
    KeyFile(#[from] KeyFileError),
    /// 会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 答题卡转写错误
///
/// 不论是网络失败还是返回格式不对，对用户来说都是同一个"转写失败"，
/// 见 [`TranscriptionError::user_message`]。
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空")]
    EmptyResponse,
    /// 返回内容不符合答题卡格式
    #[error("LLM返回内容不符合答题卡格式: {reason}")]
    MalformedResponse { reason: String },
}

impl TranscriptionError {
    /// 创建LLM API调用错误
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TranscriptionError::ApiCallFailed {
            model: model.into(),
            source: source.into(),
        }
    }

    /// 展示给用户的统一提示
    pub fn user_message(&self) -> &'static str {
        "答题卡识别失败，模型可能无法看清图片，请重试。"
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 不支持的图片格式
    #[error("不支持的图片格式 ({path}): 仅支持 PNG、JPG、WEBP")]
    UnsupportedImageType { path: String },
}

/// 标准答案文件错误
#[derive(Debug, Error)]
pub enum KeyFileError {
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 题号无效
    #[error("题号无效: '{raw}' (应为 1 到 {max})")]
    InvalidQuestion { raw: String, max: u32 },
    /// 选项无效
    #[error("第 {question} 题的选项无效: '{raw}' (应为 A/B/C/D)")]
    InvalidChoice { question: u32, raw: String },
    /// 同一题号出现多次，如 `1` 与 `01`
    #[error("第 {question} 题重复设置: '{raw}'")]
    DuplicateQuestion { question: u32, raw: String },
    /// 正确选项过多
    #[error("第 {question} 题设置了 {count} 个正确选项，最多允许 2 个")]
    TooManyChoices { question: u32, count: usize },
}

/// 会话状态错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 当前状态不允许该操作
    #[error("当前处于 {state} 阶段，不能执行 {action}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    /// 题号超出范围
    #[error("题号 {question} 超出范围 [1, {max}]")]
    QuestionOutOfRange { question: u32, max: u32 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Transcription(TranscriptionError::MalformedResponse {
            reason: err.to_string(),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::KeyFile(KeyFileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::File(FileError::NotFound { path })
        } else {
            AppError::File(FileError::ReadFailed { path, source })
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
