// ==========================================
// 采购规划管线 - 寻源领域模型
// ==========================================
// 职责: 报价 / 寻源请求 / 策略 / 订单
// 说明: 策略与订单为派生对象,每次优化重新计算,不原地修改
// ==========================================

use crate::domain::estimate::{EstimateItem, Product, DEFAULT_CURRENCY};
use crate::domain::types::OrderStatus;
use crate::engine::strategy::{StrategyKind, StrategyType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// 金额保留两位小数
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// ProductOffer - 供应商报价快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOffer {
    pub product_id: String,
    pub product_name: String,
    pub supplier_name: String,
    /// 单价
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// 库存 (未知为 None)
    #[serde(default)]
    pub stock: Option<f64>,
    #[serde(default)]
    pub delivery_days: u32,
}

impl From<&Product> for ProductOffer {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            supplier_name: product.supplier.clone(),
            price: product.price,
            currency: product.currency.clone(),
            stock: Some(product.stock),
            delivery_days: 0,
        }
    }
}

// ==========================================
// 寻源请求
// ==========================================

/// 待寻源物料 (含候选报价,按检索相关度排序)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingItem {
    pub item_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub offers: Vec<ProductOffer>,
}

impl SourcingItem {
    /// 由估算行生成:最佳匹配 + 备选均作为候选报价 (同一商品只取一次)
    pub fn from_estimate(item: &EstimateItem) -> Self {
        let mut offers: Vec<ProductOffer> = Vec::new();
        for product in item.matched_product.iter().chain(item.alternatives.iter()) {
            if offers.iter().any(|o| o.product_id == product.id) {
                continue;
            }
            offers.push(ProductOffer::from(product));
        }

        Self {
            item_id: item.id.clone(),
            name: item.original_text.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            offers,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcingRequest {
    #[serde(default)]
    pub stage_name: Option<String>,
    pub items: Vec<SourcingItem>,
    /// 单次供应商配送费估算 (缺省取配置)
    #[serde(default)]
    pub delivery_cost_estimate: Option<f64>,
    /// 按供应商覆盖的配送费
    #[serde(default)]
    pub supplier_delivery_costs: HashMap<String, f64>,
    /// 每个物料最多考虑的候选数 (缺省取配置)
    #[serde(default)]
    pub max_candidates_per_item: Option<usize>,
}

// ==========================================
// 分配结果
// ==========================================

/// 物料 → 报价 分配 (同一策略内每个物料至多一条)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub item_id: String,
    pub requested_name: String,
    pub requested_quantity: f64,
    pub unit: String,
    pub offer: ProductOffer,
}

impl Assignment {
    pub fn line_cost(&self) -> f64 {
        self.offer.price * self.requested_quantity
    }
}

/// 订单行 (保留原始需求名称与数量以便回溯)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub requested_name: String,
    pub requested_quantity: f64,
    pub unit: String,
    pub price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingOrder {
    pub supplier_name: String,
    pub items: Vec<OrderLine>,
    pub subtotal: f64,
    pub delivery_cost: f64,
    pub total: f64,
}

// ==========================================
// SourcingStrategy - 寻源策略
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingStrategy {
    pub strategy_name: String,
    pub kind: StrategyKind,
    pub description: String,
    pub assignments: Vec<Assignment>,
    pub orders: Vec<SourcingOrder>,
    pub total_items_cost: f64,
    pub total_delivery_cost: f64,
    pub total_budget: f64,
    pub suppliers_count: usize,
    pub coverage_percent: f64,
    /// 未覆盖物料名称
    pub missing_items: Vec<String>,
}

impl SourcingStrategy {
    pub fn strategy_type(&self) -> StrategyType {
        self.kind.strategy_type()
    }
}

/// 单一供应商视角的报价方案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierProposal {
    pub supplier_name: String,
    pub items: Vec<Assignment>,
    pub total_price: f64,
    pub items_count: usize,
    pub coverage_percent: f64,
    pub missing_items: Vec<String>,
    pub delivery_cost: f64,
}

// ==========================================
// 优化结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub stage_name: Option<String>,
    pub items_requested: usize,
    pub items_found: usize,
    /// 固定三种策略
    pub strategies: Vec<SourcingStrategy>,
    pub recommended_strategy: Option<StrategyType>,
    /// 外部摘要服务产出,原样透传
    pub ai_summary: String,
    pub potential_savings: f64,
    pub processing_time_ms: u64,
    /// 所有物料均无报价
    pub no_candidates: bool,
}

impl OptimizationResult {
    pub fn strategy(&self, strategy_type: StrategyType) -> Option<&SourcingStrategy> {
        self.strategies
            .iter()
            .find(|s| s.strategy_type() == strategy_type)
    }

    pub fn recommended(&self) -> Option<&SourcingStrategy> {
        self.recommended_strategy.and_then(|t| self.strategy(t))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparisonDetail {
    pub name: String,
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    pub total_budget: f64,
    pub suppliers_count: usize,
    pub coverage_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub stage_name: Option<String>,
    pub items_count: usize,
    pub strategies_found: usize,
    pub recommended: Option<StrategyType>,
    pub potential_savings: f64,
    pub summary: String,
    pub details: Vec<StrategyComparisonDetail>,
}

// ==========================================
// 生成订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedOrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedOrder {
    pub id: String,
    pub supplier_name: String,
    pub items: Vec<GeneratedOrderItem>,
    pub subtotal: f64,
    pub delivery_cost: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrdersRequest {
    pub strategy_type: StrategyType,
    #[serde(default)]
    pub stage_name: Option<String>,
    pub orders: Vec<SourcingOrder>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrdersResponse {
    pub orders: Vec<GeneratedOrder>,
    pub total_orders: usize,
    pub total_budget: f64,
}
