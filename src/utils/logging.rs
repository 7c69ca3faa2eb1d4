/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::GradeSummary;

/// 记录程序启动信息
pub fn log_startup(config: &Config, total_papers: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 答题卡批改模式");
    info!("🤖 识别模型: {}", config.llm_model_name);
    info!("📄 待批改答题卡: {} 张", total_papers);
    info!("{}", "=".repeat(60));
}

/// 记录单张答题卡开始信息
pub fn log_paper_start(paper_index: usize, total: usize, file_name: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📄 [{}/{}] 开始批改: {}", paper_index, total, file_name);
    info!("{}", "─".repeat(60));
}

/// 记录单张答题卡的成绩
pub fn log_paper_graded(paper_index: usize, student_name: &str, summary: &GradeSummary) {
    info!(
        "✓ [答题卡 {}] {}: {}% (正确 {}, 错误 {})",
        paper_index,
        truncate_text(student_name, 40),
        summary.score_display(),
        summary.correct,
        summary.incorrect
    );
}

/// 打印最终统计信息
pub fn print_final_stats(graded: usize, failed: usize, abandoned: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部批改完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已判分: {}/{}", graded, total);
    info!("❌ 识别失败: {}", failed);
    info!("↩️ 放弃核对: {}", abandoned);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
