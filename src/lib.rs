//! # Answer Sheet Grader
//!
//! 用视觉模型识别选择题答题卡并按标准答案判分的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 选项、标准答案、作答、成绩、答题卡图片
//! - `AnswerKey` - 每题最多两个正确选项
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `Transcriber` - 答题卡识别能力（视觉模型）
//! - `normalize_answers` - 作答规范化，补齐缺失题目
//! - `grade` - 判分
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张答题卡"的完整处理流程
//! - `GradingSession` - setup → review → results 状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 命令行入口，逐张驱动会话
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnswerKey, Choice, GradedAnswer, MarkedAnswer, StudentAnswer, QUESTION_COUNT};
pub use orchestrator::App;
pub use services::{Transcriber, VisionTranscriber};
pub use workflow::{AnalyzeOutcome, GradingSession, View};
