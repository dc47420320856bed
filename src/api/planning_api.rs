// ==========================================
// 采购规划管线 - 规划 API
// ==========================================
// 职责: 组合四个引擎与外部协作方 (检索 / 摘要),供宿主应用调用
// 说明: 无持久化,状态由调用方持有并传入
// ==========================================

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, PlannerConfig};
use crate::domain::estimate::{EstimateItem, Product, RawEstimateItem};
use crate::domain::schedule::{Schedule, ScheduleItem, StageProgress, StageTemplate};
use crate::domain::sourcing::{
    CreateOrdersRequest, CreateOrdersResponse, OptimizationResult, SourcingItem, SourcingOrder,
    SourcingRequest, StrategyComparison, SupplierProposal,
};
use crate::domain::types::StageStatus;
use crate::engine::export;
use crate::engine::matcher::{ItemMatcher, MatchBatch, SemanticSearch};
use crate::engine::orders::OrderGenerator;
use crate::engine::schedule::{change_status, update_progress, ScheduleBuilder, StatusChange};
use crate::engine::sourcing::SourcingOptimizer;
use crate::engine::strategy::{available_strategies, StrategyInfo, StrategyType};
use crate::engine::summary::{OptionalSummarizer, StrategySummarizer};

// ==========================================
// PlanningApi - 规划 API
// ==========================================

/// 规划API
///
/// 职责：
/// 1. 物料匹配（批量 / 选中 / 人工检索与选择）
/// 2. 寻源优化（三种策略 + 推荐 + 摘要）
/// 3. 订单生成与导出
/// 4. 施工排期（构建 / 进度 / 状态 / 依赖）
pub struct PlanningApi {
    config: PlannerConfig,
    matcher: ItemMatcher,
    optimizer: SourcingOptimizer,
    schedule_builder: ScheduleBuilder,
    // 摘要服务（未配置时 ai_summary 为空）
    summarizer: OptionalSummarizer,
}

impl PlanningApi {
    /// 创建新的PlanningApi实例
    pub fn new(
        search: Arc<dyn SemanticSearch>,
        summarizer: Option<Arc<dyn StrategySummarizer>>,
        config: PlannerConfig,
    ) -> Self {
        let summarizer = match summarizer {
            Some(s) => OptionalSummarizer::with_summarizer(s),
            None => OptionalSummarizer::none(),
        };

        Self {
            matcher: ItemMatcher::new(search, config.matcher.clone()),
            optimizer: SourcingOptimizer::new(config.sourcing.clone()),
            schedule_builder: ScheduleBuilder::new(config.schedule.clone()),
            summarizer,
            config,
        }
    }

    /// 从配置管理器创建（先校验配置）
    pub fn from_config_manager(
        search: Arc<dyn SemanticSearch>,
        summarizer: Option<Arc<dyn StrategySummarizer>>,
        manager: &ConfigManager,
    ) -> ApiResult<Self> {
        manager.validate()?;
        Ok(Self::new(search, summarizer, manager.config().clone()))
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    // ==========================================
    // 物料匹配接口
    // ==========================================

    /// 解析结果转估算行（生成 id，状态 manual）
    pub fn import_raw_items(raw: Vec<RawEstimateItem>) -> Vec<EstimateItem> {
        raw.into_iter().map(EstimateItem::from_raw).collect()
    }

    /// 批量匹配全部物料
    ///
    /// # 返回
    /// - Ok(MatchBatch): 与输入同序；单条失败已降级，不作为错误返回
    pub async fn match_items(
        &self,
        items: Vec<EstimateItem>,
        cancel: &CancellationToken,
    ) -> ApiResult<MatchBatch> {
        if items.is_empty() {
            return Err(ApiError::InvalidInput("估算行列表为空".to_string()));
        }
        Ok(self.matcher.match_all(items, cancel).await)
    }

    /// 仅匹配选中的物料
    pub async fn match_selected(
        &self,
        items: Vec<EstimateItem>,
        item_ids: &[String],
        cancel: &CancellationToken,
    ) -> ApiResult<MatchBatch> {
        if item_ids.is_empty() {
            return Err(ApiError::InvalidInput("未选择任何物料".to_string()));
        }
        for id in item_ids {
            if !items.iter().any(|i| &i.id == id) {
                return Err(ApiError::NotFound(format!("估算行(id={})不存在", id)));
            }
        }
        Ok(self.matcher.match_selected(items, item_ids, cancel).await)
    }

    /// 人工检索商品
    pub async fn search_products(&self, query: &str, limit: usize) -> ApiResult<Vec<Product>> {
        Ok(self.matcher.search_products(query, limit).await?)
    }

    /// 人工选择商品（匹配分置 1.0，状态 matched）
    pub fn select_product(
        &self,
        items: &mut [EstimateItem],
        item_id: &str,
        product: Product,
        alternatives: Vec<Product>,
    ) -> ApiResult<()> {
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| ApiError::NotFound(format!("估算行(id={})不存在", item_id)))?;
        ItemMatcher::select_product(item, product, alternatives);
        Ok(())
    }

    // ==========================================
    // 寻源接口
    // ==========================================

    /// 阶段寻源优化
    ///
    /// 摘要失败只影响 ai_summary，不影响策略结果
    pub async fn optimize_stage(&self, request: SourcingRequest) -> ApiResult<OptimizationResult> {
        let mut result = self.optimizer.optimize(&request)?;
        if self.summarizer.is_configured() && !result.no_candidates {
            result.ai_summary = self.summarizer.summarize_or_empty(&result).await;
        }
        Ok(result)
    }

    /// 以估算行为输入的寻源优化（候选来自匹配结果）
    pub async fn optimize_items(
        &self,
        stage_name: Option<String>,
        items: &[EstimateItem],
    ) -> ApiResult<OptimizationResult> {
        let request = SourcingRequest {
            stage_name,
            items: items.iter().map(SourcingItem::from_estimate).collect(),
            ..SourcingRequest::default()
        };
        self.optimize_stage(request).await
    }

    /// 各供应商独立报价方案
    pub fn supplier_proposals(
        &self,
        request: &SourcingRequest,
    ) -> ApiResult<Vec<SupplierProposal>> {
        Ok(self.optimizer.supplier_proposals(request)?)
    }

    /// 策略快速对比
    pub fn compare_strategies(&self, result: &OptimizationResult) -> StrategyComparison {
        SourcingOptimizer::compare(result)
    }

    pub fn available_strategies(&self) -> Vec<StrategyInfo> {
        available_strategies()
    }

    // ==========================================
    // 订单接口
    // ==========================================

    /// 取出指定策略的订单（全部物料无报价时报错）
    pub fn orders_for_strategy(
        &self,
        result: &OptimizationResult,
        strategy_type: StrategyType,
    ) -> ApiResult<Vec<SourcingOrder>> {
        SourcingOptimizer::require_candidates(result)?;
        result
            .strategy(strategy_type)
            .map(|s| s.orders.clone())
            .ok_or_else(|| ApiError::NotFound(format!("策略: {}", strategy_type)))
    }

    /// 由所选策略生成草稿订单
    pub fn create_orders(&self, request: CreateOrdersRequest) -> ApiResult<CreateOrdersResponse> {
        Ok(OrderGenerator::create_orders(request)?)
    }

    pub fn export_orders_csv(&self, orders: &[SourcingOrder], path: &Path) -> ApiResult<()> {
        Ok(export::export_orders_csv(orders, path)?)
    }

    /// 打印版订单文档
    pub fn orders_document(&self, orders: &[SourcingOrder], stage_name: Option<&str>) -> String {
        export::orders_to_text(orders, stage_name)
    }

    // ==========================================
    // 排期接口
    // ==========================================

    pub fn available_stages(&self) -> Vec<StageTemplate> {
        self.schedule_builder.templates().to_vec()
    }

    /// 构建排期（默认阶段目录）
    pub fn build_schedule(
        &self,
        project_name: Option<String>,
        items: Vec<ScheduleItem>,
    ) -> ApiResult<Schedule> {
        Ok(self.schedule_builder.build(project_name, items)?)
    }

    /// 由估算行构建排期（优先使用匹配商品名称与类别）
    pub fn build_schedule_from_estimate(
        &self,
        project_name: Option<String>,
        items: &[EstimateItem],
    ) -> ApiResult<Schedule> {
        self.build_schedule(project_name, items.iter().map(ScheduleItem::from).collect())
    }

    /// 仅凭物料名称快速构建排期
    pub fn build_schedule_from_names(
        &self,
        project_name: Option<String>,
        names: &[String],
    ) -> ApiResult<Schedule> {
        if names.iter().all(|n| n.trim().is_empty()) {
            return Err(ApiError::InvalidInput("物料名称列表为空".to_string()));
        }
        Ok(self.schedule_builder.build_from_names(project_name, names)?)
    }

    /// 自定义阶段模板构建排期
    pub fn build_custom_schedule(
        &self,
        project_name: Option<String>,
        items: Vec<ScheduleItem>,
        templates: Vec<StageTemplate>,
    ) -> ApiResult<Schedule> {
        if templates.is_empty() {
            return Err(ApiError::InvalidInput("自定义阶段为空".to_string()));
        }
        info!(stages = templates.len(), "使用自定义阶段构建排期");
        let builder = ScheduleBuilder::with_templates(self.config.schedule.clone(), templates);
        Ok(builder.build(project_name, items)?)
    }

    pub fn update_stage_progress(
        &self,
        schedule: &mut Schedule,
        stage_name: &str,
        completed_items: usize,
        notes: Option<String>,
    ) -> ApiResult<StageProgress> {
        Ok(update_progress(schedule, stage_name, completed_items, notes)?)
    }

    /// 变更阶段状态（allow_override 为人工强制）
    pub fn change_stage_status(
        &self,
        schedule: &mut Schedule,
        stage_name: &str,
        status: StageStatus,
        allow_override: bool,
    ) -> ApiResult<StatusChange> {
        if allow_override {
            warn!(stage = stage_name, to = %status, "请求强制变更阶段状态");
        }
        Ok(change_status(schedule, stage_name, status, allow_override)?)
    }

    pub fn add_stage_dependency(
        &self,
        schedule: &mut Schedule,
        predecessor: &str,
        successor: &str,
    ) -> ApiResult<()> {
        Ok(self
            .schedule_builder
            .add_dependency(schedule, predecessor, successor)?)
    }

    pub fn export_schedule_csv(
        &self,
        schedule: &Schedule,
        start_date: Option<NaiveDate>,
    ) -> ApiResult<String> {
        Ok(export::schedule_to_csv(schedule, start_date)?)
    }
}
