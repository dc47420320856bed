use super::catalog::default_stage_templates;
use super::graph::{apply_timing, bridge_edges, collect_edges, validate_dependency_graph};
use crate::config::ScheduleConfig;
use crate::domain::schedule::{
    ConstructionStage, Schedule, ScheduleItem, StageDependency, StageProgress, StageTemplate,
    MAX_SCHEDULE_WEEKS,
};
use crate::domain::types::StageStatus;
use crate::engine::categorizer::{ItemCategorizer, KeywordCategorizer};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// 按名称建排期时的默认单位
pub const DEFAULT_UNIT: &str = "шт";

// ==========================================
// ScheduleBuilder - 施工排期构建器
// ==========================================
pub struct ScheduleBuilder {
    config: ScheduleConfig,
    templates: Vec<StageTemplate>,
    categorizer: Arc<dyn ItemCategorizer>,
}

impl ScheduleBuilder {
    /// 默认阶段目录 + 关键字分类
    pub fn new(config: ScheduleConfig) -> Self {
        Self::with_templates(config, default_stage_templates())
    }

    /// 自定义阶段模板
    pub fn with_templates(config: ScheduleConfig, templates: Vec<StageTemplate>) -> Self {
        let categorizer = Arc::new(KeywordCategorizer::from_templates(&templates));
        Self {
            config,
            templates,
            categorizer,
        }
    }

    pub fn with_categorizer(mut self, categorizer: Arc<dyn ItemCategorizer>) -> Self {
        self.categorizer = categorizer;
        self
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn templates(&self) -> &[StageTemplate] {
        &self.templates
    }

    // ==========================================
    // 构建
    // ==========================================

    /// 构建排期
    ///
    /// # 返回
    /// - Ok(Schedule): 阶段按拓扑序排列,未分类物料单独保留
    /// - Err(InvalidDependencyGraph): 依赖引用未知阶段或存在环路
    pub fn build(
        &self,
        project_name: Option<String>,
        items: Vec<ScheduleItem>,
    ) -> EngineResult<Schedule> {
        self.validate_templates()?;

        let names: Vec<String> = self.templates.iter().map(|t| t.stage_name.clone()).collect();
        let edges = collect_edges(&self.templates)?;
        validate_dependency_graph(&names, &edges)?;

        let total_items = items.len();
        let mut grouped: Vec<Vec<ScheduleItem>> = vec![Vec::new(); self.templates.len()];
        let mut uncategorized = Vec::new();

        for item in items {
            match self.resolve_stage(item) {
                Ok((idx, item)) => grouped[idx].push(item),
                Err(item) => {
                    debug!(item = %item.name, "物料未归入任何阶段");
                    uncategorized.push(item);
                }
            }
        }

        let mut stages = Vec::new();
        for (template, stage_items) in self.templates.iter().zip(grouped) {
            if stage_items.is_empty() && !self.config.include_empty_stages {
                continue;
            }
            stages.push(ConstructionStage {
                stage_name: template.stage_name.clone(),
                description: template.description.clone(),
                relative_start_week: 0,
                duration_weeks: template.duration_weeks,
                predecessors: Vec::new(),
                successors: Vec::new(),
                progress: StageProgress::new(stage_items.len()),
                items: stage_items,
                status: StageStatus::default(),
                min_start_week: template.min_start_week,
            });
        }

        let edges = if stages.len() == self.templates.len() {
            edges
        } else {
            let kept: HashSet<&str> = stages.iter().map(|s| s.stage_name.as_str()).collect();
            bridge_edges(&edges, &kept)
        };

        apply_timing(&mut stages, &edges, self.config.base_week)?;

        let mut schedule = Schedule {
            project_name,
            stages,
            dependencies: edges.into_iter().collect(),
            uncategorized_count: uncategorized.len(),
            uncategorized,
            total_items,
            stages_count: 0,
            total_duration_weeks: 0,
        };
        self.refresh_totals(&mut schedule);

        info!(
            project = schedule.project_name.as_deref().unwrap_or("-"),
            total_items,
            stages = schedule.stages_count,
            uncategorized = schedule.uncategorized_count,
            duration_weeks = schedule.total_duration_weeks,
            "施工排期构建完成"
        );
        Ok(schedule)
    }

    /// 仅凭物料名称快速构建 (数量 1)
    pub fn build_from_names(
        &self,
        project_name: Option<String>,
        names: &[String],
    ) -> EngineResult<Schedule> {
        let items = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| ScheduleItem {
                name: n.to_string(),
                quantity: 1.0,
                unit: DEFAULT_UNIT.to_string(),
                category: None,
            })
            .collect();
        self.build(project_name, items)
    }

    // ==========================================
    // 构建后调整
    // ==========================================

    /// 追加阶段依赖并重算排期
    ///
    /// 失败时排期保持不变
    pub fn add_dependency(
        &self,
        schedule: &mut Schedule,
        predecessor: &str,
        successor: &str,
    ) -> EngineResult<()> {
        for (name, other) in [(predecessor, successor), (successor, predecessor)] {
            if schedule.stage(name).is_none() {
                return Err(EngineError::unknown_stage(name, other));
            }
        }
        if predecessor == successor {
            return Err(EngineError::cycle(vec![
                predecessor.to_string(),
                predecessor.to_string(),
            ]));
        }

        let mut edges: BTreeSet<StageDependency> = schedule.dependencies.iter().cloned().collect();
        if !edges.insert(StageDependency::new(predecessor, successor)) {
            debug!(predecessor, successor, "依赖已存在");
            return Ok(());
        }

        let mut stages = schedule.stages.clone();
        apply_timing(&mut stages, &edges, self.config.base_week)?;

        schedule.stages = stages;
        schedule.dependencies = edges.into_iter().collect();
        self.refresh_totals(schedule);

        info!(predecessor, successor, "新增阶段依赖");
        Ok(())
    }

    // ==========================================
    // 内部方法
    // ==========================================

    fn validate_templates(&self) -> EngineResult<()> {
        if self.config.base_week > MAX_SCHEDULE_WEEKS {
            return Err(EngineError::InvalidInput(format!(
                "基准周超出上限 {}: {}",
                MAX_SCHEDULE_WEEKS, self.config.base_week
            )));
        }

        let mut seen = HashSet::new();
        for template in &self.templates {
            let name = template.stage_name.trim();
            if name.is_empty() {
                return Err(EngineError::InvalidInput("阶段名称为空".to_string()));
            }
            if !seen.insert(name) {
                return Err(EngineError::InvalidInput(format!("阶段名称重复: {}", name)));
            }
            if template.duration_weeks > MAX_SCHEDULE_WEEKS {
                return Err(EngineError::InvalidInput(format!(
                    "阶段 {} 工期超出上限 {} 周: {}",
                    name, MAX_SCHEDULE_WEEKS, template.duration_weeks
                )));
            }
            if let Some(week) = template.min_start_week.filter(|w| *w > MAX_SCHEDULE_WEEKS) {
                return Err(EngineError::InvalidInput(format!(
                    "阶段 {} 最早开工周超出上限 {}: {}",
                    name, MAX_SCHEDULE_WEEKS, week
                )));
            }
        }
        Ok(())
    }

    /// 定位物料所属阶段;缺类别时先经分类器补全
    fn resolve_stage(&self, mut item: ScheduleItem) -> Result<(usize, ScheduleItem), ScheduleItem> {
        let explicit = item
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let category = match explicit {
            Some(c) => c,
            None => match self.categorizer.categorize(&item) {
                Some(c) => {
                    item.category = Some(c.clone());
                    c
                }
                None => return Err(item),
            },
        };

        match self.templates.iter().position(|t| t.accepts(&category)) {
            Some(idx) => Ok((idx, item)),
            None => Err(item),
        }
    }

    fn refresh_totals(&self, schedule: &mut Schedule) {
        schedule.stages_count = schedule.stages.len();
        schedule.uncategorized_count = schedule.uncategorized.len();
        schedule.total_duration_weeks = schedule
            .stages
            .iter()
            .map(|s| s.end_week())
            .max()
            .unwrap_or(0)
            .saturating_sub(self.config.base_week);
    }
}
