use super::answer::MarkedAnswer;

/// 未识别到姓名时使用的默认值
pub const DEFAULT_STUDENT_NAME: &str = "Unknown Student";

/// 模型识别出的单题作答
///
/// 题号保留模型返回的原值，可能越界或重复，由规范化步骤处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscribedMark {
    pub question_number: i64,
    pub marked_answer: MarkedAnswer,
}

impl TranscribedMark {
    pub fn new(question_number: i64, marked_answer: MarkedAnswer) -> Self {
        Self {
            question_number,
            marked_answer,
        }
    }
}

/// 一张答题卡的识别结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub student_name: String,
    pub marks: Vec<TranscribedMark>,
}

impl Transcription {
    /// 构建识别结果，空白姓名替换为默认值
    pub fn new(student_name: impl Into<String>, marks: Vec<TranscribedMark>) -> Self {
        let student_name = student_name.into().trim().to_string();
        let student_name = if student_name.is_empty() {
            DEFAULT_STUDENT_NAME.to_string()
        } else {
            student_name
        };
        Self {
            student_name,
            marks,
        }
    }
}
