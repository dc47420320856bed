// ==========================================
// 采购规划管线 - 施工排期领域模型
// ==========================================
// 职责: 施工阶段 / 阶段依赖 / 进度
// 说明: 阶段在排期构建时生成,之后仅 status 与 progress 可变
// ==========================================

use crate::domain::estimate::EstimateItem;
use crate::domain::types::StageStatus;
use serde::{Deserialize, Serialize};

/// 排期周数上限 (工期 / 最早开工周 / 基准周)
pub const MAX_SCHEDULE_WEEKS: u32 = 520;

/// 排期物料 (category 为外部分类结果,可为空)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl From<&EstimateItem> for ScheduleItem {
    fn from(item: &EstimateItem) -> Self {
        // 优先使用匹配商品名称
        let name = item
            .matched_product
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| item.original_text.clone());
        let category = item.category.clone().or_else(|| {
            item.matched_product
                .as_ref()
                .map(|p| p.category.clone())
                .filter(|c| !c.trim().is_empty())
        });

        Self {
            name,
            quantity: item.quantity,
            unit: item.unit.clone(),
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    pub completed_items: usize,
    pub total_items: usize,
    pub percent_complete: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StageProgress {
    pub fn new(total_items: usize) -> Self {
        Self {
            completed_items: 0,
            total_items,
            percent_complete: 0.0,
            notes: None,
        }
    }

    /// totalItems = 0 时为 0
    pub fn percent(completed_items: usize, total_items: usize) -> f64 {
        if total_items == 0 {
            return 0.0;
        }
        completed_items as f64 / total_items as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionStage {
    pub stage_name: String,
    pub description: String,
    pub relative_start_week: u32,
    pub duration_weeks: u32,
    pub predecessors: Vec<String>,
    pub successors: Vec<String>,
    pub items: Vec<ScheduleItem>,
    pub status: StageStatus,
    pub progress: StageProgress,
    /// 最早开工周 (来自模板,重算排期时沿用)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_start_week: Option<u32>,
}

impl ConstructionStage {
    pub fn end_week(&self) -> u32 {
        self.relative_start_week.saturating_add(self.duration_weeks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageDependency {
    pub predecessor: String,
    pub successor: String,
}

impl StageDependency {
    pub fn new(predecessor: impl Into<String>, successor: impl Into<String>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
        }
    }
}

/// 阶段模板 (默认目录或自定义配置)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTemplate {
    pub stage_name: String,
    #[serde(default)]
    pub description: String,
    /// 归入此阶段的施工类别
    #[serde(default)]
    pub categories: Vec<String>,
    /// 关键字 (用于缺省分类)
    #[serde(default)]
    pub keywords: Vec<String>,
    pub duration_weeks: u32,
    #[serde(default)]
    pub predecessors: Vec<String>,
    #[serde(default)]
    pub successors: Vec<String>,
    /// 最早开工周 (下限)
    #[serde(default)]
    pub min_start_week: Option<u32>,
}

impl StageTemplate {
    pub fn new(stage_name: impl Into<String>, duration_weeks: u32) -> Self {
        Self {
            stage_name: stage_name.into(),
            description: String::new(),
            categories: Vec::new(),
            keywords: Vec::new(),
            duration_weeks,
            predecessors: Vec::new(),
            successors: Vec::new(),
            min_start_week: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn after(mut self, predecessors: &[&str]) -> Self {
        self.predecessors = predecessors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn before(mut self, successors: &[&str]) -> Self {
        self.successors = successors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn not_before(mut self, week: u32) -> Self {
        self.min_start_week = Some(week);
        self
    }

    /// 类别是否归属本阶段 (忽略大小写)
    pub fn accepts(&self, category: &str) -> bool {
        let category = category.trim();
        self.stage_name.eq_ignore_ascii_case(category)
            || self
                .categories
                .iter()
                .any(|c| c.trim().to_lowercase() == category.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub project_name: Option<String>,
    /// 拓扑序,开工周升序
    pub stages: Vec<ConstructionStage>,
    pub dependencies: Vec<StageDependency>,
    pub uncategorized: Vec<ScheduleItem>,
    pub total_items: usize,
    pub stages_count: usize,
    pub uncategorized_count: usize,
    pub total_duration_weeks: u32,
}

impl Schedule {
    pub fn stage(&self, stage_name: &str) -> Option<&ConstructionStage> {
        self.stages.iter().find(|s| s.stage_name == stage_name)
    }

    pub fn stage_mut(&mut self, stage_name: &str) -> Option<&mut ConstructionStage> {
        self.stages.iter_mut().find(|s| s.stage_name == stage_name)
    }
}
