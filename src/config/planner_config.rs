// ==========================================
// 采购规划管线 - 配置项定义
// ==========================================
// 职责: 各引擎可调参数及默认值
// ==========================================

use serde::{Deserialize, Serialize};

/// 匹配器参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// 每次检索取前 K 个候选 (首个为最佳匹配)
    pub top_k: usize,

    /// 批量匹配并发上限
    pub max_concurrency: usize,

    /// 单条匹配超时（毫秒）
    pub item_timeout_ms: u64,

    /// 检索结果缺少质量分时采用的默认分
    pub missing_score_default: f64,

    /// 人工检索最短查询长度
    pub min_query_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_concurrency: 8,
            item_timeout_ms: 10_000,
            missing_score_default: 0.5,
            min_query_len: 2,
        }
    }
}

/// 寻源优化参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcingConfig {
    /// 单次供应商配送费估算
    pub delivery_cost_estimate: f64,

    /// 每个物料最多考虑的候选报价数
    pub max_candidates_per_item: usize,

    /// 均衡策略的供应商上限
    pub balanced_max_suppliers: usize,

    /// 推荐均衡策略的覆盖率容差（相对最佳覆盖率的比例，0~1）
    pub recommendation_tolerance: f64,

    /// 是否剔除库存不足的报价
    pub respect_stock: bool,
}

impl Default for SourcingConfig {
    fn default() -> Self {
        Self {
            delivery_cost_estimate: 1500.0,
            max_candidates_per_item: 5,
            balanced_max_suppliers: 3,
            recommendation_tolerance: 0.9,
            respect_stock: false,
        }
    }
}

/// 施工排期参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 无前置阶段的默认开工周
    pub base_week: u32,

    /// 是否保留无物料的阶段
    pub include_empty_stages: bool,
}

/// 全局配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlannerConfig {
    pub matcher: MatcherConfig,
    pub sourcing: SourcingConfig,
    pub schedule: ScheduleConfig,
}
