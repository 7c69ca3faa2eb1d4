use std::path::PathBuf;

use answer_sheet_grader::{logger, App, Config};
use anyhow::Result;
use clap::Parser;

/// 用视觉模型批改选择题答题卡
#[derive(Debug, Parser)]
#[command(name = "answer-sheet-grader", version)]
struct Cli {
    /// 标准答案 TOML 文件
    #[arg(short, long, env = "ANSWER_KEY_PATH")]
    key: PathBuf,

    /// 答题卡图片（PNG / JPG / WEBP），按顺序逐张批改
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// 跳过人工核对，直接按识别结果判分
    #[arg(short, long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config);
    app.run(&cli.key, &cli.images, cli.yes).await?;

    Ok(())
}
