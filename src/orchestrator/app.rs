//! 批改流程编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责把命令行给出的答题卡逐张送进阅卷会话。
//!
//! ## 核心功能
//!
//! 1. **加载标准答案**：读取 TOML 文件，不完整则直接退出
//! 2. **逐张批改**：每张答题卡走一遍 setup → review → results
//! 3. **人工核对**：从标准输入读取修改命令，`--yes` 时跳过核对
//! 4. **全局统计**：汇总判分、失败、放弃的数量
//!
//! 同一时间只批改一张答题卡，识别请求不会并发。

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{load_answer_key, load_sheet_image, AnswerKey, GradeSummary};
use crate::orchestrator::console::{
    parse_review_command, render_results, render_review, ReviewCommand, REVIEW_HELP,
};
use crate::services::{Transcriber, VisionTranscriber};
use crate::utils::logging::{log_paper_graded, log_paper_start, log_startup, print_final_stats};
use crate::workflow::{AnalyzeOutcome, GradingSession};

/// 单张答题卡的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperOutcome {
    /// 已判分
    Graded,
    /// 读取或识别失败
    Failed,
    /// 核对阶段放弃
    Abandoned,
}

/// 单张答题卡的成绩记录
#[derive(Debug, Clone, PartialEq)]
pub struct PaperReport {
    pub file_name: String,
    pub student_name: String,
    pub summary: GradeSummary,
}

/// 批改统计
#[derive(Debug, Default)]
pub struct RunStats {
    pub total: usize,
    pub graded: usize,
    pub failed: usize,
    pub abandoned: usize,
    pub reports: Vec<PaperReport>,
}

/// 应用主结构
pub struct App<T = VisionTranscriber> {
    config: Config,
    transcriber: T,
}

impl App<VisionTranscriber> {
    /// 使用视觉模型初始化应用
    pub fn initialize(config: Config) -> Self {
        let transcriber = VisionTranscriber::new(&config);
        Self {
            config,
            transcriber,
        }
    }
}

impl<T: Transcriber> App<T> {
    /// 使用自定义转写器创建应用
    pub fn with_transcriber(config: Config, transcriber: T) -> Self {
        Self {
            config,
            transcriber,
        }
    }

    /// 运行应用主逻辑，核对命令从标准输入读取
    pub async fn run(
        &self,
        key_path: &Path,
        image_paths: &[PathBuf],
        auto_confirm: bool,
    ) -> Result<RunStats> {
        let key = load_answer_key(key_path).await?;
        let mut input = BufReader::new(tokio::io::stdin()).lines();
        self.grade_papers(key, image_paths, auto_confirm, &mut input)
            .await
    }

    /// 用给定的标准答案批改全部答题卡
    pub async fn grade_papers<R>(
        &self,
        key: AnswerKey,
        image_paths: &[PathBuf],
        auto_confirm: bool,
        input: &mut Lines<R>,
    ) -> Result<RunStats>
    where
        R: AsyncBufRead + Unpin,
    {
        if !key.is_complete() {
            anyhow::bail!(
                "标准答案不完整，缺少第 {:?} 题",
                key.missing_questions()
            );
        }

        log_startup(&self.config, image_paths.len());

        let mut session = GradingSession::with_key(key);
        let mut stats = RunStats {
            total: image_paths.len(),
            ..Default::default()
        };

        for (index, path) in image_paths.iter().enumerate() {
            let paper_index = index + 1;
            let file_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            log_paper_start(paper_index, image_paths.len(), &file_name);

            let image = match load_sheet_image(path).await {
                Ok(image) => image,
                Err(e) => {
                    error!("[答题卡 {}] 读取失败: {}", paper_index, e);
                    stats.failed += 1;
                    continue;
                }
            };
            session.set_image(image);

            match self
                .grade_one(&mut session, paper_index, auto_confirm, input)
                .await?
            {
                (PaperOutcome::Graded, Some(report)) => {
                    stats.graded += 1;
                    stats.reports.push(PaperReport {
                        file_name,
                        ..report
                    });
                }
                (PaperOutcome::Graded, None) => stats.graded += 1,
                (PaperOutcome::Failed, _) => stats.failed += 1,
                (PaperOutcome::Abandoned, _) => stats.abandoned += 1,
            }
        }

        print_final_stats(stats.graded, stats.failed, stats.abandoned, stats.total);

        Ok(stats)
    }

    /// 批改会话中已载入的答题卡
    async fn grade_one<R>(
        &self,
        session: &mut GradingSession,
        paper_index: usize,
        auto_confirm: bool,
        input: &mut Lines<R>,
    ) -> Result<(PaperOutcome, Option<PaperReport>)>
    where
        R: AsyncBufRead + Unpin,
    {
        match session.analyze(&self.transcriber).await? {
            AnalyzeOutcome::Reviewing => {}
            AnalyzeOutcome::Blocked(blockers) => {
                for blocker in &blockers {
                    warn!("[答题卡 {}] ⚠️ {}", paper_index, blocker);
                }
                return Ok((PaperOutcome::Failed, None));
            }
            AnalyzeOutcome::Failed => {
                let message = session.error().unwrap_or_default();
                error!("[答题卡 {}] {}", paper_index, message);
                println!("❌ {}", message);
                return Ok((PaperOutcome::Failed, None));
            }
        }

        if !auto_confirm && !self.review(session, input).await? {
            session.back()?;
            info!("[答题卡 {}] ↩️ 已放弃本张答题卡", paper_index);
            return Ok((PaperOutcome::Abandoned, None));
        }

        let summary = session.confirm()?;
        let student_name = session.student_name().unwrap_or_default().to_string();
        if let Some(graded) = session.graded() {
            println!("{}", render_results(&student_name, graded, &summary));
        }
        log_paper_graded(paper_index, &student_name, &summary);

        session.start_over()?;

        Ok((
            PaperOutcome::Graded,
            Some(PaperReport {
                file_name: String::new(),
                student_name,
                summary,
            }),
        ))
    }

    /// 人工核对，返回 `true` 表示确认判分，`false` 表示放弃
    ///
    /// 输入结束（EOF）视为放弃。
    async fn review<R>(&self, session: &mut GradingSession, input: &mut Lines<R>) -> Result<bool>
    where
        R: AsyncBufRead + Unpin,
    {
        print_review(session);
        println!("{}", REVIEW_HELP);

        loop {
            print!("> ");
            std::io::stdout().flush().context("无法刷新标准输出")?;

            let Some(line) = input.next_line().await.context("读取核对命令失败")? else {
                warn!("输入已结束，放弃核对");
                return Ok(false);
            };

            match parse_review_command(&line) {
                ReviewCommand::Override { question, answer } => {
                    session.override_answer(question, answer)?;
                    info!("✏️ 第 {} 题改为 {}", question, answer);
                }
                ReviewCommand::Confirm => return Ok(true),
                ReviewCommand::Back => return Ok(false),
                ReviewCommand::Show => print_review(session),
                ReviewCommand::Help => println!("{}", REVIEW_HELP),
                ReviewCommand::Invalid(message) => println!("⚠️ {}", message),
            }
        }
    }
}

fn print_review(session: &GradingSession) {
    if let (Some(name), Some(answers)) = (session.student_name(), session.answers()) {
        println!("{}", render_review(name, answers));
    }
}
