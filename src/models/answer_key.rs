//! 标准答案
//!
//! 每道题最多两个正确选项；没有选项的题目不在表里保存空集合。

use std::collections::{BTreeMap, BTreeSet};

use super::answer::{Choice, QUESTION_COUNT};

/// 每道题最多允许的正确选项数
pub const MAX_ACCEPTED: usize = 2;

/// 标准答案表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    entries: BTreeMap<u32, BTreeSet<Choice>>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换某题的某个选项
    ///
    /// 已选中则取消；未选中且不足两个则加入；已满两个时忽略。
    /// 题号超出范围同样忽略。返回答案表是否发生变化。
    pub fn toggle(&mut self, question: u32, choice: Choice) -> bool {
        if !(1..=QUESTION_COUNT).contains(&question) {
            return false;
        }

        let accepted = self.entries.entry(question).or_default();
        let changed = if accepted.remove(&choice) {
            true
        } else if accepted.len() < MAX_ACCEPTED {
            accepted.insert(choice)
        } else {
            false
        };

        if accepted.is_empty() {
            self.entries.remove(&question);
        }
        changed
    }

    /// 整体设置某题的正确选项，供加载文件时使用
    ///
    /// 调用方负责校验题号范围和选项数量；空集合等同于未设置。
    pub(crate) fn set_accepted(&mut self, question: u32, choices: BTreeSet<Choice>) {
        debug_assert!((1..=QUESTION_COUNT).contains(&question));
        debug_assert!(choices.len() <= MAX_ACCEPTED);
        if choices.is_empty() {
            self.entries.remove(&question);
        } else {
            self.entries.insert(question, choices);
        }
    }

    /// 是否每道题都至少有一个正确选项
    pub fn is_complete(&self) -> bool {
        (1..=QUESTION_COUNT).all(|question| self.entries.contains_key(&question))
    }

    /// 某题的正确选项（按字母排序）
    pub fn accepted(&self, question: u32) -> Option<&BTreeSet<Choice>> {
        self.entries.get(&question)
    }

    /// 尚未设置正确选项的题号
    pub fn missing_questions(&self) -> Vec<u32> {
        (1..=QUESTION_COUNT)
            .filter(|question| !self.entries.contains_key(question))
            .collect()
    }

    /// 已设置答案的题目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
