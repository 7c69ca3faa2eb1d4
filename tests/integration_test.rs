use answer_sheet_grader::error::TranscriptionError;
use answer_sheet_grader::models::{
    parse_answer_key, ImageMime, SheetImage, TranscribedMark, Transcription, QUESTION_COUNT,
};
use answer_sheet_grader::orchestrator::{App, PaperReport};
use answer_sheet_grader::services::parse_transcription;
use answer_sheet_grader::{
    AnalyzeOutcome, AnswerKey, Choice, Config, GradingSession, MarkedAnswer, Transcriber,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};

/// 按顺序返回预设结果的转写器
struct ScriptedTranscriber {
    replies: Mutex<VecDeque<Result<String, ()>>>,
}

impl ScriptedTranscriber {
    fn new(replies: Vec<Result<String, ()>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, _image: &SheetImage) -> Result<Transcription, TranscriptionError> {
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) => parse_transcription(&text),
            _ => Err(TranscriptionError::api_call_failed(
                "scripted",
                "connection reset",
            )),
        }
    }
}

fn key_toml() -> String {
    let mut content = String::from("[answers]\n");
    for question in 1..=QUESTION_COUNT {
        let letters = match question {
            2 => r#"["B", "C"]"#,
            _ => r#"["A"]"#,
        };
        content.push_str(&format!("{} = {}\n", question, letters));
    }
    content
}

fn reply(name: &str, marks: &[(i64, &str)]) -> String {
    let answers: Vec<String> = marks
        .iter()
        .map(|(q, a)| format!(r#"{{"questionNumber":{},"markedAnswer":"{}"}}"#, q, a))
        .collect();
    format!(
        r#"{{"studentName":"{}","answers":[{}]}}"#,
        name,
        answers.join(",")
    )
}

fn write_images(dir: &std::path::Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"fake image bytes").unwrap();
            path
        })
        .collect()
}

#[tokio::test]
async fn test_session_scenario_case_insensitive() {
    let mut key = AnswerKey::new();
    for question in 1..=QUESTION_COUNT {
        key.toggle(question, Choice::D);
    }
    // 第 1 题改为 A，第 2 题接受 B 或 C
    key.toggle(1, Choice::D);
    key.toggle(1, Choice::A);
    key.toggle(2, Choice::D);
    key.toggle(2, Choice::B);
    key.toggle(2, Choice::C);

    let transcriber = ScriptedTranscriber::new(vec![Ok(reply(
        "Chen Jing",
        &[(1, "a"), (2, "B")],
    ))]);

    let mut session = GradingSession::with_key(key);
    session.set_image(SheetImage::new("paper.png", ImageMime::Png, vec![0; 8]));

    let outcome = session.analyze(&transcriber).await.unwrap();
    assert_eq!(outcome, AnalyzeOutcome::Reviewing);

    let summary = session.confirm().unwrap();
    let graded = session.graded().unwrap();

    assert_eq!(graded.len(), QUESTION_COUNT as usize);
    assert!(graded[0].is_correct);
    assert!(graded[1].is_correct);
    assert!(graded[2..].iter().all(|r| !r.is_correct));
    assert_eq!(summary.score_display(), "6.7");
    assert_eq!(summary.correct + summary.incorrect, QUESTION_COUNT as usize);
}

#[tokio::test]
async fn test_missing_question_becomes_unanswered() {
    let key = parse_answer_key(&key_toml()).unwrap();
    let marks: Vec<(i64, &str)> = (1..=30).filter(|q| *q != 5).map(|q| (q, "A")).collect();
    let transcriber = ScriptedTranscriber::new(vec![Ok(reply("Zhou Yu", &marks))]);

    let mut session = GradingSession::with_key(key);
    session.set_image(SheetImage::new("paper.jpg", ImageMime::Jpeg, vec![1]));
    session.analyze(&transcriber).await.unwrap();

    let answers = session.answers().unwrap();
    assert_eq!(answers[4].question_number, 5);
    assert_eq!(answers[4].marked_answer, MarkedAnswer::Unanswered);
}

#[tokio::test]
async fn test_collaborator_failure_keeps_setup() {
    let key = parse_answer_key(&key_toml()).unwrap();
    let transcriber = ScriptedTranscriber::new(vec![Err(()), Ok("not json".to_string())]);

    let mut session = GradingSession::with_key(key);
    session.set_image(SheetImage::new("paper.webp", ImageMime::Webp, vec![1]));

    // 网络失败
    assert_eq!(
        session.analyze(&transcriber).await.unwrap(),
        AnalyzeOutcome::Failed
    );
    assert_eq!(session.view().name(), "setup");
    assert!(session.error().is_some());
    assert!(session.graded().is_none());

    // 格式错误同样只得到一条提示
    let first_message = session.error().map(str::to_string);
    assert_eq!(
        session.analyze(&transcriber).await.unwrap(),
        AnalyzeOutcome::Failed
    );
    assert_eq!(session.error().map(str::to_string), first_message);
}

#[tokio::test]
async fn test_app_grades_with_review_commands() {
    let dir = tempfile::tempdir().unwrap();
    let images = write_images(dir.path(), &["first.png", "second.jpg", "third.gif"]);

    let transcriber = ScriptedTranscriber::new(vec![
        Ok(reply("Sun Li", &[(1, "A"), (2, "D")])),
        Ok(reply("Qian Wei", &[(1, "A")])),
    ]);
    let app = App::with_transcriber(Config::default(), transcriber);

    // 第一张：把第 2 题改成 C 后确认；第二张：放弃
    let script: &[u8] = b"2 C\nwhat\nok\nback\n";
    let mut input = BufReader::new(script).lines();

    let key = parse_answer_key(&key_toml()).unwrap();
    let stats = app
        .grade_papers(key, &images, false, &mut input)
        .await
        .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.graded, 1);
    assert_eq!(stats.abandoned, 1);
    // gif 不支持
    assert_eq!(stats.failed, 1);

    let PaperReport {
        file_name,
        student_name,
        summary,
    } = &stats.reports[0];
    assert_eq!(file_name, "first.png");
    assert_eq!(student_name, "Sun Li");
    assert_eq!(summary.correct, 2);
}

#[tokio::test]
async fn test_app_auto_confirm_and_failure() {
    let dir = tempfile::tempdir().unwrap();
    let images = write_images(dir.path(), &["a.png", "b.png"]);

    let all_a: Vec<(i64, &str)> = (1..=30).map(|q| (q, "A")).collect();
    let transcriber = ScriptedTranscriber::new(vec![Err(()), Ok(reply("", &all_a))]);
    let app = App::with_transcriber(Config::default(), transcriber);

    let mut input = BufReader::new(&b""[..]).lines();
    let key = parse_answer_key(&key_toml()).unwrap();
    let stats = app.grade_papers(key, &images, true, &mut input).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.graded, 1);
    let report = &stats.reports[0];
    assert_eq!(report.student_name, "Unknown Student");
    // 第 2 题接受 B/C，作答 A 判错
    assert_eq!(report.summary.correct, 29);
    assert_eq!(report.summary.score_display(), "96.7");
}

#[tokio::test]
async fn test_app_rejects_incomplete_key() {
    let app = App::with_transcriber(Config::default(), ScriptedTranscriber::new(vec![]));
    let mut input = BufReader::new(&b""[..]).lines();

    let result = app
        .grade_papers(AnswerKey::new(), &[PathBuf::from("x.png")], true, &mut input)
        .await;
    assert!(result.is_err());
}

#[test]
fn test_duplicate_marks_first_wins_end_to_end() {
    let transcription =
        parse_transcription(&reply("Dup", &[(4, "B"), (4, "C"), (99, "A")])).unwrap();
    assert_eq!(
        transcription.marks,
        vec![
            TranscribedMark::new(4, MarkedAnswer::Choice(Choice::B)),
            TranscribedMark::new(4, MarkedAnswer::Choice(Choice::C)),
            TranscribedMark::new(99, MarkedAnswer::Choice(Choice::A)),
        ]
    );
    let answers = answer_sheet_grader::services::normalize_answers(&transcription.marks);
    assert_eq!(answers.len(), QUESTION_COUNT as usize);
    assert_eq!(answers[3].marked_answer, MarkedAnswer::Choice(Choice::B));
}
