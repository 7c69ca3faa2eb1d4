//! 作答规范化
//!
//! 模型返回的作答可能缺题、重复或题号越界。这里把它整理成
//! 恰好 `QUESTION_COUNT` 条、按题号升序排列的列表，缺失的题目记为 `N/A`。

use tracing::{debug, warn};

use crate::models::{StudentAnswer, TranscribedMark, QUESTION_COUNT};

/// 规范化模型返回的作答
///
/// 同一题号出现多次时只保留第一条。
pub fn normalize_answers(marks: &[TranscribedMark]) -> Vec<StudentAnswer> {
    let answers: Vec<StudentAnswer> = (1..=QUESTION_COUNT)
        .map(|question| {
            marks
                .iter()
                .find(|mark| mark.question_number == i64::from(question))
                .map(|mark| StudentAnswer::new(question, mark.marked_answer))
                .unwrap_or_else(|| StudentAnswer::unanswered(question))
        })
        .collect();

    let in_range = |mark: &&TranscribedMark| {
        (1..=i64::from(QUESTION_COUNT)).contains(&mark.question_number)
    };
    let out_of_range = marks.iter().filter(|m| !in_range(m)).count();
    let kept = answers_found(marks);
    let duplicates = marks.iter().filter(in_range).count() - kept;

    if out_of_range > 0 {
        warn!("丢弃 {} 条题号越界的作答", out_of_range);
    }
    if duplicates > 0 {
        warn!("丢弃 {} 条重复题号的作答（保留第一条）", duplicates);
    }
    if kept < QUESTION_COUNT as usize {
        debug!("{} 道题缺少作答，记为 N/A", QUESTION_COUNT as usize - kept);
    }

    answers
}

/// 模型实际覆盖到的题目数量
fn answers_found(marks: &[TranscribedMark]) -> usize {
    (1..=i64::from(QUESTION_COUNT))
        .filter(|question| marks.iter().any(|m| m.question_number == *question))
        .count()
}
