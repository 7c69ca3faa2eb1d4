//! 阅卷会话 - 流程层
//!
//! 核心职责：定义"一张答题卡"的完整处理流程
//!
//! ```text
//! setup ──analyze──▶ review ──confirm──▶ results
//!   ▲                  │                    │
//!   └──────back────────┘                    │
//!   └──────────────start_over───────────────┘
//! ```
//!
//! 每个状态只携带该状态下有效的数据：识别结果只存在于 `Review`，
//! 判分结果只存在于 `Results`。标准答案在整个会话中保留，
//! 可以连续批改多张答题卡。

use tracing::{info, warn};

use crate::error::SessionError;
use crate::models::{
    AnswerKey, Choice, GradeSummary, GradedAnswer, MarkedAnswer, SheetImage, StudentAnswer,
    QUESTION_COUNT,
};
use crate::services::{grade, normalize_answers, Transcriber};

/// 会话当前所处的阶段及其数据
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// 上传图片、填写标准答案
    Setup { error: Option<String> },
    /// 人工核对识别结果
    Review {
        student_name: String,
        answers: Vec<StudentAnswer>,
    },
    /// 展示成绩
    Results {
        student_name: String,
        graded: Vec<GradedAnswer>,
        summary: GradeSummary,
    },
}

impl View {
    fn setup() -> Self {
        View::Setup { error: None }
    }

    /// 阶段名称
    pub fn name(&self) -> &'static str {
        match self {
            View::Setup { .. } => "setup",
            View::Review { .. } => "review",
            View::Results { .. } => "results",
        }
    }
}

/// 不能开始识别的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    /// 还没有上传答题卡图片
    MissingImage,
    /// 标准答案不完整
    IncompleteKey { missing: Vec<u32> },
}

impl std::fmt::Display for Blocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Blocker::MissingImage => write!(f, "尚未上传答题卡图片"),
            Blocker::IncompleteKey { missing } => {
                let list = missing
                    .iter()
                    .map(|q| q.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "标准答案不完整，缺少第 {} 题", list)
            }
        }
    }
}

/// 识别操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    /// 识别成功，进入核对阶段
    Reviewing,
    /// 前置条件不满足，未发起识别
    Blocked(Vec<Blocker>),
    /// 识别失败，仍停留在 setup，错误信息见 [`GradingSession::error`]
    Failed,
}

/// 阅卷会话
///
/// 所有状态都在这一个对象里，由各个转移方法修改。
/// `analyze` 需要 `&mut self`，同一会话同一时间只能有一次识别在进行。
#[derive(Debug)]
pub struct GradingSession {
    key: AnswerKey,
    image: Option<SheetImage>,
    view: View,
}

impl Default for GradingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GradingSession {
    pub fn new() -> Self {
        Self::with_key(AnswerKey::new())
    }

    /// 使用已有的标准答案创建会话
    pub fn with_key(key: AnswerKey) -> Self {
        Self {
            key,
            image: None,
            view: View::setup(),
        }
    }

    // ========== 查询 ==========

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    pub fn image(&self) -> Option<&SheetImage> {
        self.image.as_ref()
    }

    /// setup 阶段的错误提示
    pub fn error(&self) -> Option<&str> {
        match &self.view {
            View::Setup { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn student_name(&self) -> Option<&str> {
        match &self.view {
            View::Review { student_name, .. } | View::Results { student_name, .. } => {
                Some(student_name)
            }
            View::Setup { .. } => None,
        }
    }

    /// review 阶段的作答（含人工修改）
    pub fn answers(&self) -> Option<&[StudentAnswer]> {
        match &self.view {
            View::Review { answers, .. } => Some(answers),
            _ => None,
        }
    }

    pub fn graded(&self) -> Option<&[GradedAnswer]> {
        match &self.view {
            View::Results { graded, .. } => Some(graded),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&GradeSummary> {
        match &self.view {
            View::Results { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// 开始识别前还缺什么
    pub fn blockers(&self) -> Vec<Blocker> {
        let mut blockers = Vec::new();
        if self.image.is_none() {
            blockers.push(Blocker::MissingImage);
        }
        if !self.key.is_complete() {
            blockers.push(Blocker::IncompleteKey {
                missing: self.key.missing_questions(),
            });
        }
        blockers
    }

    /// 是否可以开始识别
    pub fn can_analyze(&self) -> bool {
        matches!(self.view, View::Setup { .. }) && self.blockers().is_empty()
    }

    // ========== setup 阶段 ==========

    /// 上传新的答题卡
    ///
    /// 任何阶段都可以调用，旧图片被释放，识别和判分结果全部丢弃，回到 setup。
    pub fn set_image(&mut self, image: SheetImage) {
        info!("📄 载入答题卡: {}", image.file_name());
        self.image = Some(image);
        self.view = View::setup();
    }

    /// 移除答题卡图片，回到 setup
    pub fn clear_image(&mut self) {
        self.image = None;
        self.view = View::setup();
    }

    /// 切换标准答案中某题的某个选项，只能在 setup 阶段修改
    pub fn toggle_key(&mut self, question: u32, choice: Choice) -> Result<bool, SessionError> {
        self.expect_state("toggle_key", |view| matches!(view, View::Setup { .. }))?;
        check_question(question)?;
        Ok(self.key.toggle(question, choice))
    }

    /// setup → review
    ///
    /// 前置条件不满足时不发起识别。识别失败时错误被转换为提示信息，
    /// 会话停留在 setup，可以直接重试。
    pub async fn analyze<T>(&mut self, transcriber: &T) -> Result<AnalyzeOutcome, SessionError>
    where
        T: Transcriber + ?Sized,
    {
        self.expect_state("analyze", |view| matches!(view, View::Setup { .. }))?;

        let blockers = self.blockers();
        let image = match self.image.as_ref() {
            Some(image) if blockers.is_empty() => image,
            _ => {
                let message = blockers
                    .iter()
                    .map(|b| b.to_string())
                    .collect::<Vec<_>>()
                    .join("；");
                warn!("⚠️ 无法开始识别: {}", message);
                self.view = View::Setup {
                    error: Some(message),
                };
                return Ok(AnalyzeOutcome::Blocked(blockers));
            }
        };

        self.view = View::setup();

        match transcriber.transcribe(image).await {
            Ok(transcription) => {
                let answers = normalize_answers(&transcription.marks);
                info!(
                    "✓ 识别完成，进入核对阶段: {}",
                    transcription.student_name
                );
                self.view = View::Review {
                    student_name: transcription.student_name,
                    answers,
                };
                Ok(AnalyzeOutcome::Reviewing)
            }
            Err(e) => {
                warn!("❌ 答题卡识别失败: {}", e);
                self.view = View::Setup {
                    error: Some(e.user_message().to_string()),
                };
                Ok(AnalyzeOutcome::Failed)
            }
        }
    }

    // ========== review 阶段 ==========

    /// 人工修改某题的作答
    pub fn override_answer(
        &mut self,
        question: u32,
        marked_answer: MarkedAnswer,
    ) -> Result<(), SessionError> {
        check_question(question)?;
        match &mut self.view {
            View::Review { answers, .. } => {
                if let Some(answer) = answers
                    .iter_mut()
                    .find(|answer| answer.question_number == question)
                {
                    answer.marked_answer = marked_answer;
                }
                Ok(())
            }
            other => Err(SessionError::InvalidTransition {
                action: "override_answer",
                state: other.name(),
            }),
        }
    }

    /// review → results：确认作答并判分
    pub fn confirm(&mut self) -> Result<GradeSummary, SessionError> {
        match std::mem::replace(&mut self.view, View::setup()) {
            View::Review {
                student_name,
                answers,
            } => {
                let graded = grade(&self.key, &answers);
                let summary = GradeSummary::from_results(&graded);
                info!("📊 {} 判分完成: {}", student_name, summary);
                self.view = View::Results {
                    student_name,
                    graded,
                    summary,
                };
                Ok(summary)
            }
            other => {
                let state = other.name();
                self.view = other;
                Err(SessionError::InvalidTransition {
                    action: "confirm",
                    state,
                })
            }
        }
    }

    /// review → setup：放弃本次识别结果
    pub fn back(&mut self) -> Result<(), SessionError> {
        self.expect_state("back", |view| matches!(view, View::Review { .. }))?;
        self.view = View::setup();
        Ok(())
    }

    // ========== results 阶段 ==========

    /// results → setup：清空本张答题卡的全部数据，保留标准答案
    pub fn start_over(&mut self) -> Result<(), SessionError> {
        self.expect_state("start_over", |view| matches!(view, View::Results { .. }))?;
        self.image = None;
        self.view = View::setup();
        Ok(())
    }

    fn expect_state(
        &self,
        action: &'static str,
        allowed: impl Fn(&View) -> bool,
    ) -> Result<(), SessionError> {
        if allowed(&self.view) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                state: self.view.name(),
            })
        }
    }
}

fn check_question(question: u32) -> Result<(), SessionError> {
    if (1..=QUESTION_COUNT).contains(&question) {
        Ok(())
    } else {
        Err(SessionError::QuestionOutOfRange {
            question,
            max: QUESTION_COUNT,
        })
    }
}
