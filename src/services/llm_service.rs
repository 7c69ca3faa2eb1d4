//! LLM 服务 - 业务能力层
//!
//! 只负责"调用 LLM"能力，不关心答题卡的格式
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;

/// LLM 服务
///
/// 职责：
/// - 发送文本和图片给兼容 OpenAI 的 Chat Completions 接口
/// - 返回模型的原始文本回复
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `imgs`: 图片 URL 列表（可选，支持 data URL），会追加到用户消息中
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    ///
    /// # 示例
    /// ```no_run
    /// # use answer_sheet_grader::services::LlmService;
    /// # async fn example(service: &LlmService) -> anyhow::Result<()> {
    /// let response = service.send_to_llm(
    ///     "这张图片里有什么？",
    ///     Some("你是一个简洁的助手"),
    ///     Some(&["data:image/png;base64,iVBORw0KGgo=".to_string()]),
    /// ).await?;
    /// println!("LLM 响应: {}", response);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        imgs: Option<&[String]>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let img_urls = imgs.unwrap_or_default();
        let user_msg = if img_urls.is_empty() {
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?
        } else {
            // Vision API：图片在前，指令在后
            let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> =
                Vec::with_capacity(img_urls.len() + 1);

            for url in img_urls {
                content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                    ChatCompletionRequestMessageContentPartImage {
                        image_url: ImageUrl {
                            url: url.clone(),
                            detail: Some(ImageDetail::High),
                        },
                    },
                ));
            }

            content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: user_message.to_string(),
                },
            ));

            debug!("使用 Vision API，包含 {} 张图片", img_urls.len());

            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(
                    content_parts,
                ))
                .build()?
        };

        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> LlmService {
        LlmService::new(&Config::from_env().unwrap_or_default())
    }

    #[test]
    fn test_service_uses_configured_model() {
        let config = Config {
            llm_model_name: "vision-test-model".to_string(),
            ..Config::default()
        };
        let service = LlmService::new(&config);
        assert_eq!(service.model_name(), "vision-test-model");
        assert_eq!(service.max_tokens, config.llm_max_tokens);
    }

    /// 测试通用 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_send_to_llm_simple -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_send_to_llm_simple() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();

        let result = service
            .send_to_llm("只回复 OK 两个字母", Some("你是一个简洁的助手。"), None)
            .await;

        match result {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                assert!(!response.is_empty());
            }
            Err(e) => panic!("测试失败: {}", e),
        }
    }
}
