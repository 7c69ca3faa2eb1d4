use crate::error::{AppError, AppResult, KeyFileError};
use crate::models::answer::{Choice, QUESTION_COUNT};
use crate::models::answer_key::{AnswerKey, MAX_ACCEPTED};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tokio::fs;

/// 标准答案 TOML 文件结构
///
/// ```toml
/// [answers]
/// 1 = ["A"]
/// 2 = ["B", "C"]
/// ```
#[derive(Debug, Deserialize)]
struct AnswerKeyFile {
    #[serde(default)]
    answers: BTreeMap<String, Vec<String>>,
}

/// 从 TOML 文件加载标准答案
pub async fn load_answer_key(toml_file_path: &Path) -> Result<AnswerKey> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取标准答案文件: {}", toml_file_path.display()))?;

    let key = parse_answer_key(&content).map_err(|e| match e {
        AppError::KeyFile(KeyFileError::TomlParseFailed { source, .. }) => {
            AppError::KeyFile(KeyFileError::TomlParseFailed {
                path: toml_file_path.display().to_string(),
                source,
            })
        }
        other => other,
    })?;

    tracing::info!(
        "成功加载标准答案: {} 道题已设置 ({})",
        key.len(),
        toml_file_path.display()
    );

    Ok(key)
}

/// 解析标准答案 TOML 内容
///
/// 严格校验：题号、选项或选项数量有任何一处不合法都整体失败。
pub fn parse_answer_key(content: &str) -> AppResult<AnswerKey> {
    let file: AnswerKeyFile = toml::from_str(content)?;
    let mut key = AnswerKey::new();
    let mut seen = BTreeSet::new();

    for (raw_question, raw_choices) in &file.answers {
        let question = raw_question
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| (1..=QUESTION_COUNT).contains(q))
            .ok_or_else(|| KeyFileError::InvalidQuestion {
                raw: raw_question.clone(),
                max: QUESTION_COUNT,
            })?;

        if !seen.insert(question) {
            return Err(KeyFileError::DuplicateQuestion {
                question,
                raw: raw_question.clone(),
            }
            .into());
        }

        let mut choices = BTreeSet::new();
        for raw in raw_choices {
            let choice = Choice::from_letter(raw).ok_or_else(|| KeyFileError::InvalidChoice {
                question,
                raw: raw.clone(),
            })?;
            choices.insert(choice);
        }

        if choices.len() > MAX_ACCEPTED {
            return Err(KeyFileError::TooManyChoices {
                question,
                count: choices.len(),
            }
            .into());
        }

        key.set_accepted(question, choices);
    }

    Ok(key)
}
