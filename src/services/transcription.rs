//! 答题卡转写服务 - 业务能力层
//!
//! 把答题卡图片交给视觉模型，得到学生姓名和每题的涂选结果。
//! 模型返回的文本在这里做严格校验，格式不对就整体失败，不向后传递半成品。

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::TranscriptionError;
use crate::models::{MarkedAnswer, SheetImage, TranscribedMark, Transcription, QUESTION_COUNT};
use crate::services::llm_service::LlmService;
use crate::utils::logging::truncate_text;

/// 答题卡转写能力
///
/// 会话只依赖这个 trait，测试时可以替换成固定返回的实现。
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, image: &SheetImage) -> Result<Transcription, TranscriptionError>;
}

const SYSTEM_MESSAGE: &str = "You are a highly precise automated test grading assistant. \
You only ever answer with a single JSON object and no other text.";

/// 构建识别指令
fn build_prompt() -> String {
    format!(
        r#"Analyze the provided image of a multiple-choice answer sheet with extreme accuracy. The sheet contains {n} questions, numbered 1 to {n}, each with options A, B, C, and D.

Instructions:
1. Identify the student's name: locate the student's full name, typically written at the top of the paper. If you cannot find a name, use the string 'Unknown Student'.
2. Examine each question row individually. For each question number, locate the corresponding set of A, B, C, D options.
3. Identify the student's mark: a filled circle or a distinct black dot inside one option.
4. Handle ambiguity with care:
   - If a question has no marks, the answer is 'N/A'.
   - If a question has multiple options marked, the answer is 'N/A'.
   - If a mark is faint, smudged, or not clearly inside one option, prioritize the most confident reading. If it is impossible to determine, the answer is 'N/A'.
5. Output format: return a single JSON object of the form
   {{"studentName": "<name>", "answers": [{{"questionNumber": 1, "markedAnswer": "A"}}, ...]}}
   with exactly {n} entries in `answers`, one for each question from 1 to {n}. `questionNumber` is an integer and `markedAnswer` must be one of 'A', 'B', 'C', 'D', or 'N/A'.

Accuracy is critical. Do not guess. If an answer is unclear, it is better to mark it as 'N/A'."#,
        n = QUESTION_COUNT
    )
}

/// 基于视觉模型的转写实现
pub struct VisionTranscriber {
    llm_service: LlmService,
}

impl VisionTranscriber {
    pub fn new(config: &Config) -> Self {
        Self {
            llm_service: LlmService::new(config),
        }
    }
}

#[async_trait]
impl Transcriber for VisionTranscriber {
    async fn transcribe(&self, image: &SheetImage) -> Result<Transcription, TranscriptionError> {
        info!(
            "🤖 正在识别答题卡 {} ({} 字节)...",
            image.file_name(),
            image.bytes().len()
        );

        let imgs = [image.to_data_url()];
        let response = self
            .llm_service
            .send_to_llm(&build_prompt(), Some(SYSTEM_MESSAGE), Some(&imgs))
            .await
            .map_err(|e| {
                TranscriptionError::api_call_failed(self.llm_service.model_name(), e)
            })?;

        let transcription = parse_transcription(&response).map_err(|e| {
            warn!("模型回复无法解析: {}", truncate_text(&response, 200));
            e
        })?;

        info!(
            "✓ 识别完成: {}，共 {} 条作答",
            transcription.student_name,
            transcription.marks.len()
        );

        Ok(transcription)
    }
}

/// 模型回复的 JSON 结构
///
/// 姓名为 null 或缺失时按未识别处理。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTranscription {
    #[serde(default)]
    student_name: Option<String>,
    answers: Vec<WireMark>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMark {
    question_number: i64,
    marked_answer: String,
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("code fence regex is valid")
    })
}

/// 解析并校验模型回复
///
/// 回复可以被 Markdown 代码块包裹。字段缺失、类型不符或作答不在
/// A/B/C/D/N/A 之内都会返回 [`TranscriptionError::MalformedResponse`]。
/// 题号越界不算格式错误，交给规范化步骤丢弃。
pub fn parse_transcription(text: &str) -> Result<Transcription, TranscriptionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TranscriptionError::EmptyResponse);
    }

    let payload = code_fence()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);

    let wire: WireTranscription =
        serde_json::from_str(payload).map_err(|e| TranscriptionError::MalformedResponse {
            reason: e.to_string(),
        })?;

    let marks = wire
        .answers
        .into_iter()
        .map(|mark| {
            MarkedAnswer::parse(&mark.marked_answer)
                .map(|answer| TranscribedMark::new(mark.question_number, answer))
                .ok_or_else(|| TranscriptionError::MalformedResponse {
                    reason: format!(
                        "第 {} 题的作答 '{}' 不是 A/B/C/D/N/A",
                        mark.question_number, mark.marked_answer
                    ),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("解析出 {} 条作答", marks.len());

    Ok(Transcription::new(wire.student_name.unwrap_or_default(), marks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Choice, DEFAULT_STUDENT_NAME};

    #[test]
    fn test_parse_plain_json() {
        let text = r#"{"studentName":"Wang Fang","answers":[{"questionNumber":1,"markedAnswer":"a"},{"questionNumber":2,"markedAnswer":"N/A"}]}"#;
        let transcription = parse_transcription(text).unwrap();

        assert_eq!(transcription.student_name, "Wang Fang");
        assert_eq!(
            transcription.marks,
            vec![
                TranscribedMark::new(1, MarkedAnswer::Choice(Choice::A)),
                TranscribedMark::new(2, MarkedAnswer::Unanswered),
            ]
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "Here you go:\n```json\n{\"studentName\": \"\", \"answers\": []}\n```";
        let transcription = parse_transcription(text).unwrap();
        assert_eq!(transcription.student_name, DEFAULT_STUDENT_NAME);
        assert!(transcription.marks.is_empty());
    }

    #[test]
    fn test_null_or_missing_name_defaults() {
        for text in [
            r#"{"studentName":null,"answers":[{"questionNumber":3,"markedAnswer":"D"}]}"#,
            r#"{"answers":[{"questionNumber":3,"markedAnswer":"D"}]}"#,
        ] {
            let transcription = parse_transcription(text).unwrap();
            assert_eq!(transcription.student_name, DEFAULT_STUDENT_NAME);
            assert_eq!(
                transcription.marks,
                vec![TranscribedMark::new(3, MarkedAnswer::Choice(Choice::D))]
            );
        }
    }

    #[test]
    fn test_out_of_range_numbers_pass_through() {
        let text = r#"{"studentName":"X","answers":[{"questionNumber":42,"markedAnswer":"B"},{"questionNumber":-1,"markedAnswer":"C"}]}"#;
        let transcription = parse_transcription(text).unwrap();
        assert_eq!(transcription.marks.len(), 2);
        assert_eq!(transcription.marks[0].question_number, 42);
    }

    #[test]
    fn test_rejects_malformed_responses() {
        let cases = [
            "I could not read the image.",
            r#"{"studentName":42,"answers":[]}"#,
            r#"{"studentName":"X"}"#,
            r#"{"studentName":"X","answers":[{"questionNumber":"1","markedAnswer":"A"}]}"#,
            r#"{"studentName":"X","answers":[{"questionNumber":1,"markedAnswer":"E"}]}"#,
            r#"{"studentName":"X","answers":[{"questionNumber":1}]}"#,
        ];
        for case in cases {
            assert!(
                matches!(
                    parse_transcription(case),
                    Err(TranscriptionError::MalformedResponse { .. })
                ),
                "应拒绝: {}",
                case
            );
        }
    }

    #[test]
    fn test_rejects_empty_response() {
        assert!(matches!(
            parse_transcription("   "),
            Err(TranscriptionError::EmptyResponse)
        ));
    }

    #[test]
    fn test_prompt_mentions_question_count() {
        let prompt = build_prompt();
        assert!(prompt.contains("numbered 1 to 30"));
        assert!(prompt.contains("Unknown Student"));
    }

    /// 测试真实答题卡识别
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... SHEET_IMAGE=sheet.jpg cargo test test_vision_transcribe -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_vision_transcribe() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().unwrap_or_default();
        let path = std::env::var("SHEET_IMAGE").unwrap_or_else(|_| "sheet.jpg".to_string());
        let image = crate::models::load_sheet_image(std::path::Path::new(&path))
            .await
            .expect("读取图片失败");

        let transcriber = VisionTranscriber::new(&config);
        match transcriber.transcribe(&image).await {
            Ok(transcription) => {
                println!("姓名: {}", transcription.student_name);
                for mark in &transcription.marks {
                    println!("  {:>2}: {}", mark.question_number, mark.marked_answer);
                }
            }
            Err(e) => panic!("识别失败: {}", e),
        }
    }
}
