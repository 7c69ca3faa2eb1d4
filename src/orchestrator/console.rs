//! 终端交互
//!
//! 核对阶段的命令解析，以及核对表和成绩单的文本渲染。

use crate::models::{GradeSummary, GradedAnswer, MarkedAnswer, StudentAnswer, QUESTION_COUNT};

/// 核对阶段的用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    /// 修改某题作答，如 `5 B`、`5=n/a`
    Override {
        question: u32,
        answer: MarkedAnswer,
    },
    /// 确认并判分
    Confirm,
    /// 放弃本张答题卡
    Back,
    /// 重新显示核对表
    Show,
    Help,
    /// 无法识别的输入，附带提示
    Invalid(String),
}

pub const REVIEW_HELP: &str = "命令: <题号> <A|B|C|D|N/A> 修改作答 | ok 确认判分 | back 放弃本张 | show 重新显示 | help 帮助";

/// 解析核对阶段的一行输入
pub fn parse_review_command(line: &str) -> ReviewCommand {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "show" | "s" => return ReviewCommand::Show,
        "ok" | "confirm" | "y" | "yes" => return ReviewCommand::Confirm,
        "back" | "b" => return ReviewCommand::Back,
        "help" | "h" | "?" => return ReviewCommand::Help,
        _ => {}
    }

    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == '=' || c == ':')
        .filter(|part| !part.is_empty());
    let (Some(raw_question), Some(raw_answer), None) = (parts.next(), parts.next(), parts.next())
    else {
        return ReviewCommand::Invalid(format!("无法识别的命令: '{}'", line));
    };

    let question = match raw_question.parse::<u32>() {
        Ok(q) if (1..=QUESTION_COUNT).contains(&q) => q,
        _ => {
            return ReviewCommand::Invalid(format!(
                "题号 '{}' 无效，应为 1 到 {}",
                raw_question, QUESTION_COUNT
            ))
        }
    };

    match MarkedAnswer::parse(raw_answer) {
        Some(answer) => ReviewCommand::Override { question, answer },
        None => ReviewCommand::Invalid(format!(
            "作答 '{}' 无效，应为 A/B/C/D/N/A",
            raw_answer
        )),
    }
}

/// 渲染核对表，每行 5 题
pub fn render_review(student_name: &str, answers: &[StudentAnswer]) -> String {
    let mut out = format!("学生: {}\n", student_name);
    for row in answers.chunks(5) {
        let cells: Vec<String> = row
            .iter()
            .map(|a| format!("{:>2}: {:<3}", a.question_number, a.marked_answer.as_str()))
            .collect();
        out.push_str("  ");
        out.push_str(cells.join("   ").trim_end());
        out.push('\n');
    }
    out
}

/// 渲染成绩单
pub fn render_results(
    student_name: &str,
    graded: &[GradedAnswer],
    summary: &GradeSummary,
) -> String {
    let mut out = format!("成绩单: {}\n", student_name);
    out.push_str(&format!(
        "  得分 {}%   正确 {}   错误 {}\n",
        summary.score_display(),
        summary.correct,
        summary.incorrect
    ));
    for result in graded {
        out.push_str(&format!(
            "  {} {:>2}  作答 {:<3}  正确答案 {}\n",
            if result.is_correct { "✓" } else { "✗" },
            result.question_number,
            result.student_answer.as_str(),
            result.correct_answer_display()
        ));
    }
    out
}
