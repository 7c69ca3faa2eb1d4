//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责把命令行输入接到阅卷会话上，是整个系统的"指挥中心"。
//!
//! ### `app` - 批改流程编排
//! - 加载标准答案和答题卡图片
//! - 逐张驱动 `GradingSession`
//! - 输出全局统计信息
//!
//! ### `console` - 终端交互
//! - 解析核对阶段的修改命令
//! - 渲染核对表和成绩单
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (处理 Vec<图片>)
//!     ↓
//! workflow::GradingSession (处理单张答题卡)
//!     ↓
//! services (能力层：transcription / normalizer / grading)
//!     ↓
//! models (数据：标准答案 / 作答 / 成绩)
//! ```

pub mod app;
pub mod console;

pub use app::{App, PaperOutcome, PaperReport, RunStats};
pub use console::{parse_review_command, ReviewCommand};
