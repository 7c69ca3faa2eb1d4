//! 选项与作答
//!
//! `Choice` 是标准答案可以使用的选项，`MarkedAnswer` 额外包含未作答 (`N/A`)。

use serde::{Deserialize, Serialize};

/// 答题卡题目总数
pub const QUESTION_COUNT: u32 = 30;

/// 未作答的显示值
pub const UNANSWERED: &str = "N/A";

/// 选项枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// 全部选项（按字母顺序）
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    /// 获取选项字母
    pub fn letter(self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        }
    }

    /// 从字母解析选项（忽略大小写和首尾空白）
    pub fn from_letter(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Choice::A),
            "B" => Some(Choice::B),
            "C" => Some(Choice::C),
            "D" => Some(Choice::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 学生在某一题上的作答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MarkedAnswer {
    /// 选择了某个选项
    Choice(Choice),
    /// 未作答、多选或无法辨认
    Unanswered,
}

impl MarkedAnswer {
    /// 解析作答，接受 A/B/C/D/N/A（忽略大小写）
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(UNANSWERED) {
            return Some(MarkedAnswer::Unanswered);
        }
        Choice::from_letter(trimmed).map(MarkedAnswer::Choice)
    }

    /// 作答对应的选项，未作答时为 `None`
    pub fn choice(self) -> Option<Choice> {
        match self {
            MarkedAnswer::Choice(choice) => Some(choice),
            MarkedAnswer::Unanswered => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MarkedAnswer::Choice(choice) => choice.letter(),
            MarkedAnswer::Unanswered => UNANSWERED,
        }
    }
}

impl From<Choice> for MarkedAnswer {
    fn from(choice: Choice) -> Self {
        MarkedAnswer::Choice(choice)
    }
}

impl TryFrom<String> for MarkedAnswer {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MarkedAnswer::parse(&value).ok_or_else(|| format!("无效的作答: '{}'", value))
    }
}

impl From<MarkedAnswer> for String {
    fn from(answer: MarkedAnswer) -> Self {
        answer.as_str().to_string()
    }
}

impl std::fmt::Display for MarkedAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 某一题的学生作答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswer {
    pub question_number: u32,
    pub marked_answer: MarkedAnswer,
}

impl StudentAnswer {
    pub fn new(question_number: u32, marked_answer: MarkedAnswer) -> Self {
        Self {
            question_number,
            marked_answer,
        }
    }

    /// 未作答的占位记录
    pub fn unanswered(question_number: u32) -> Self {
        Self::new(question_number, MarkedAnswer::Unanswered)
    }
}
