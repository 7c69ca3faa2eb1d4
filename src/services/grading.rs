//! 判分引擎
//!
//! 假定调用方已经保证标准答案完整、作答已经规范化，这里不再校验。
//! 标准答案缺失的题目得到空的正确选项集合，自然判为错误。

use crate::models::{AnswerKey, GradedAnswer, MarkedAnswer, StudentAnswer, QUESTION_COUNT};

/// 按题号 1..=N 逐题判分
pub fn grade(key: &AnswerKey, answers: &[StudentAnswer]) -> Vec<GradedAnswer> {
    (1..=QUESTION_COUNT)
        .map(|question| {
            let marked = answers
                .iter()
                .find(|answer| answer.question_number == question)
                .map(|answer| answer.marked_answer)
                .unwrap_or(MarkedAnswer::Unanswered);
            let accepted = key.accepted(question).cloned().unwrap_or_default();
            GradedAnswer::new(question, marked, accepted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Choice, GradeSummary, TranscribedMark};
    use crate::services::normalizer::normalize_answers;

    fn key_all(choice: Choice) -> AnswerKey {
        let mut key = AnswerKey::new();
        for question in 1..=QUESTION_COUNT {
            key.toggle(question, choice);
        }
        key
    }

    fn answers_all(marked: MarkedAnswer) -> Vec<StudentAnswer> {
        (1..=QUESTION_COUNT)
            .map(|q| StudentAnswer::new(q, marked))
            .collect()
    }

    #[test]
    fn test_output_is_complete_and_ordered() {
        let graded = grade(&key_all(Choice::A), &answers_all(Choice::A.into()));
        assert_eq!(graded.len(), QUESTION_COUNT as usize);
        for (index, result) in graded.iter().enumerate() {
            assert_eq!(result.question_number, index as u32 + 1);
            assert!(result.is_correct);
        }
        assert_eq!(GradeSummary::from_results(&graded).score_display(), "100.0");
    }

    #[test]
    fn test_mixed_case_scenario() {
        let mut key = AnswerKey::new();
        key.toggle(1, Choice::A);
        key.toggle(2, Choice::B);
        key.toggle(2, Choice::C);

        // 小写作答在解析时统一为大写
        let marks = vec![
            TranscribedMark::new(1, MarkedAnswer::parse("a").unwrap()),
            TranscribedMark::new(2, MarkedAnswer::parse("B").unwrap()),
        ];
        let answers = normalize_answers(&marks);
        let graded = grade(&key, &answers);

        assert!(graded[0].is_correct);
        assert!(graded[1].is_correct);
        assert!(graded[2..].iter().all(|r| !r.is_correct));

        let summary = GradeSummary::from_results(&graded);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.incorrect, 28);
        assert_eq!(summary.score_display(), "6.7");
    }

    #[test]
    fn test_incomplete_key_grades_incorrect() {
        let mut key = AnswerKey::new();
        key.toggle(1, Choice::C);
        let graded = grade(&key, &answers_all(Choice::C.into()));

        assert!(graded[0].is_correct);
        assert!(graded[1].correct_answer.is_empty());
        assert!(!graded[1].is_correct);
    }

    #[test]
    fn test_unanswered_never_correct() {
        let graded = grade(&key_all(Choice::D), &answers_all(MarkedAnswer::Unanswered));
        let summary = GradeSummary::from_results(&graded);
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.correct + summary.incorrect, QUESTION_COUNT as usize);
        assert_eq!(summary.score_display(), "0.0");
    }

    #[test]
    fn test_grading_is_idempotent() {
        let mut key = key_all(Choice::B);
        key.toggle(9, Choice::D);
        let answers: Vec<_> = (1..=QUESTION_COUNT)
            .map(|q| StudentAnswer::new(q, Choice::ALL[(q % 4) as usize].into()))
            .collect();

        assert_eq!(grade(&key, &answers), grade(&key, &answers));
    }

    #[test]
    fn test_missing_student_entry_is_unanswered() {
        let graded = grade(&key_all(Choice::A), &[]);
        assert_eq!(graded.len(), QUESTION_COUNT as usize);
        assert!(graded
            .iter()
            .all(|r| r.student_answer == MarkedAnswer::Unanswered && !r.is_correct));
    }
}
