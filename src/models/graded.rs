use std::collections::BTreeSet;

use serde::Serialize;

use super::answer::{Choice, MarkedAnswer};

/// 单题判分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_number: u32,
    pub student_answer: MarkedAnswer,
    pub correct_answer: BTreeSet<Choice>,
    pub is_correct: bool,
}

impl GradedAnswer {
    /// 构建判分结果，正确与否由正确选项集合是否包含作答决定
    pub fn new(
        question_number: u32,
        student_answer: MarkedAnswer,
        correct_answer: BTreeSet<Choice>,
    ) -> Self {
        let is_correct = student_answer
            .choice()
            .is_some_and(|choice| correct_answer.contains(&choice));
        Self {
            question_number,
            student_answer,
            correct_answer,
            is_correct,
        }
    }

    /// 正确选项的显示文本，如 "B, C"
    pub fn correct_answer_display(&self) -> String {
        self.correct_answer
            .iter()
            .map(|choice| choice.letter())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 成绩汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl GradeSummary {
    pub fn from_results(results: &[GradedAnswer]) -> Self {
        let correct = results.iter().filter(|r| r.is_correct).count();
        Self {
            total: results.len(),
            correct,
            incorrect: results.len() - correct,
        }
    }

    /// 百分制得分
    pub fn score_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }

    /// 保留一位小数的得分，如 "6.7"
    pub fn score_display(&self) -> String {
        format!("{:.1}", self.score_percent())
    }
}

impl std::fmt::Display for GradeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "得分 {}% (正确 {} / 错误 {} / 共 {})",
            self.score_display(),
            self.correct,
            self.incorrect,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanswered_is_never_correct() {
        let accepted: BTreeSet<Choice> = Choice::ALL.into_iter().collect();
        let graded = GradedAnswer::new(1, MarkedAnswer::Unanswered, accepted);
        assert!(!graded.is_correct);
    }

    #[test]
    fn test_either_accepted_choice_counts() {
        let accepted: BTreeSet<Choice> = [Choice::C, Choice::B].into_iter().collect();
        assert!(GradedAnswer::new(2, Choice::B.into(), accepted.clone()).is_correct);
        assert!(GradedAnswer::new(2, Choice::C.into(), accepted.clone()).is_correct);
        assert!(!GradedAnswer::new(2, Choice::A.into(), accepted.clone()).is_correct);
        assert_eq!(
            GradedAnswer::new(2, Choice::A.into(), accepted).correct_answer_display(),
            "B, C"
        );
    }

    #[test]
    fn test_summary_score_one_decimal() {
        let summary = GradeSummary {
            total: 30,
            correct: 2,
            incorrect: 28,
        };
        assert_eq!(summary.score_display(), "6.7");

        let summary = GradeSummary {
            total: 30,
            correct: 30,
            incorrect: 0,
        };
        assert_eq!(summary.score_display(), "100.0");
    }

    #[test]
    fn test_serializes_camel_case() {
        let graded = GradedAnswer::new(7, Choice::A.into(), [Choice::A].into_iter().collect());
        let json = serde_json::to_value(&graded).unwrap();
        assert_eq!(json["questionNumber"], 7);
        assert_eq!(json["studentAnswer"], "A");
        assert_eq!(json["isCorrect"], true);

        let summary = GradeSummary::from_results(&[graded]);
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["correct"], 1);
        assert_eq!(json["incorrect"], 0);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = GradeSummary::from_results(&[]);
        assert_eq!(summary.score_display(), "0.0");
        assert_eq!(summary.correct + summary.incorrect, 0);
    }
}
