// ==========================================
// 采购规划管线 - 物料施工类别判定
// ==========================================
// 职责: 为缺少类别的排期物料补充施工阶段
// 说明: 外部分类结果优先,此处仅兜底
// ==========================================

use crate::domain::schedule::{ScheduleItem, StageTemplate};

// ==========================================
// ItemCategorizer Trait
// ==========================================

/// 物料分类器
///
/// 返回阶段名称或施工类别,无法判定时返回 None (物料进入未分类)
pub trait ItemCategorizer: Send + Sync {
    fn categorize(&self, item: &ScheduleItem) -> Option<String>;
}

/// 不做任何判定
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCategorizer;

impl ItemCategorizer for NoOpCategorizer {
    fn categorize(&self, _item: &ScheduleItem) -> Option<String> {
        None
    }
}

// ==========================================
// KeywordCategorizer - 关键字分类
// ==========================================

#[derive(Debug, Clone)]
struct KeywordRule {
    stage_name: String,
    keywords: Vec<String>,
}

/// 按模板关键字匹配物料名称 (忽略大小写,取最长命中)
#[derive(Debug, Clone, Default)]
pub struct KeywordCategorizer {
    rules: Vec<KeywordRule>,
}

impl KeywordCategorizer {
    pub fn from_templates(templates: &[StageTemplate]) -> Self {
        let rules = templates
            .iter()
            .filter(|t| !t.keywords.is_empty())
            .map(|t| KeywordRule {
                stage_name: t.stage_name.clone(),
                keywords: t
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn rules_count(&self) -> usize {
        self.rules.len()
    }
}

impl ItemCategorizer for KeywordCategorizer {
    fn categorize(&self, item: &ScheduleItem) -> Option<String> {
        let name = item.name.to_lowercase();

        let mut best: Option<(&str, usize)> = None;
        for rule in &self.rules {
            for keyword in &rule.keywords {
                if !name.contains(keyword.as_str()) {
                    continue;
                }
                let len = keyword.chars().count();
                // 同长度保留先出现的阶段
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((rule.stage_name.as_str(), len));
                }
            }
        }

        best.map(|(stage, _)| stage.to_string())
    }
}
