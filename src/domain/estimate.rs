// ==========================================
// 采购规划管线 - 估算清单领域模型
// ==========================================
// 职责: 估算行 (EstimateItem) 与目录商品 (Product)
// 生命周期: 文档解析时创建,由匹配器或人工选择原地修改,不静默删除
// ==========================================

use crate::domain::types::MatchStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 默认币种
pub const DEFAULT_CURRENCY: &str = "RUB";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

// ==========================================
// Product - 目录商品 (语义检索结果)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub stock: f64,
}

// ==========================================
// RawEstimateItem - 文档解析器输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEstimateItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

// ==========================================
// EstimateItem - 估算行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateItem {
    pub id: String,
    pub original_text: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub matched_product: Option<Product>,
    #[serde(default)]
    pub alternatives: Vec<Product>,
    /// 置信度,范围 [0, 1]
    #[serde(default)]
    pub match_score: f64,
    pub status: MatchStatus,
    /// 施工类别 (外部分类,可为空)
    #[serde(default)]
    pub category: Option<String>,
    /// 是否经人工选择
    #[serde(default)]
    pub manually_selected: bool,
}

impl EstimateItem {
    /// 创建未匹配的估算行
    pub fn new(
        id: impl Into<String>,
        original_text: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            original_text: original_text.into(),
            quantity,
            unit: unit.into(),
            matched_product: None,
            alternatives: Vec::new(),
            match_score: 0.0,
            status: MatchStatus::Manual,
            category: None,
            manually_selected: false,
        }
    }

    /// 从解析结果创建 (生成 UUID)
    pub fn from_raw(raw: RawEstimateItem) -> Self {
        Self::new(Uuid::new_v4().to_string(), raw.name, raw.quantity, raw.unit)
    }

    /// 匹配失败降级: score=0, status=manual
    pub fn degrade_to_manual(&mut self) {
        self.matched_product = None;
        self.alternatives.clear();
        self.match_score = 0.0;
        self.status = MatchStatus::Manual;
        self.manually_selected = false;
    }
}
