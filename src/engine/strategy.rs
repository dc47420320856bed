// ==========================================
// 采购规划管线 - 寻源策略定义
// ==========================================
// 用途：
// - 寻源优化每次产出三种策略 (最低价 / 一站式 / 均衡)；
// - StrategyKind 携带各策略自身的载荷，消费端必须穷举匹配。

use serde::{Deserialize, Serialize};

/// 寻源策略类型（纯判别值，用于推荐/选择/比较）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    BestPrice,
    OneStopShop,
    Balanced,
}

impl StrategyType {
    /// 输出顺序固定
    pub const ALL: [StrategyType; 3] = [
        StrategyType::BestPrice,
        StrategyType::OneStopShop,
        StrategyType::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::BestPrice => "best_price",
            StrategyType::OneStopShop => "one_stop_shop",
            StrategyType::Balanced => "balanced",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StrategyType::BestPrice => "Эконом",
            StrategyType::OneStopShop => "Комфорт",
            StrategyType::Balanced => "Баланс",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyType::BestPrice => "每个物料选最低价,可能拆分为多家供应商多次配送",
            StrategyType::OneStopShop => "覆盖面最广的单一供应商,一次配送",
            StrategyType::Balanced => "限定少量供应商,综合单价与分摊运费",
        }
    }

    pub fn pros(&self) -> &'static [&'static str] {
        match self {
            StrategyType::BestPrice => &["物料成本最低"],
            StrategyType::OneStopShop => &["一次配送", "单一对账"],
            StrategyType::Balanced => &["成本与配送次数兼顾"],
        }
    }

    pub fn cons(&self) -> &'static [&'static str] {
        match self {
            StrategyType::BestPrice => &["供应商多", "运费高"],
            StrategyType::OneStopShop => &["单价偏高", "可能缺项"],
            StrategyType::Balanced => &["不保证每项最低价"],
        }
    }
}

impl Default for StrategyType {
    fn default() -> Self {
        StrategyType::Balanced
    }
}

impl std::fmt::Display for StrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best_price" | "best-price" => Ok(StrategyType::BestPrice),
            "one_stop_shop" | "one-stop-shop" => Ok(StrategyType::OneStopShop),
            "balanced" => Ok(StrategyType::Balanced),
            other => Err(format!("未知策略类型: {}", other)),
        }
    }
}

/// 策略载荷（带标签的和类型）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy_type", rename_all = "snake_case")]
pub enum StrategyKind {
    BestPrice,
    /// 选中的供应商；无任何报价时为空
    OneStopShop { supplier: Option<String> },
    /// 受限供应商池（按入池顺序）
    Balanced { supplier_pool: Vec<String> },
}

impl StrategyKind {
    pub fn strategy_type(&self) -> StrategyType {
        match self {
            StrategyKind::BestPrice => StrategyType::BestPrice,
            StrategyKind::OneStopShop { .. } => StrategyType::OneStopShop,
            StrategyKind::Balanced { .. } => StrategyType::Balanced,
        }
    }
}

/// 策略说明（对应前端策略卡片）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    pub name: String,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl From<StrategyType> for StrategyInfo {
    fn from(t: StrategyType) -> Self {
        Self {
            strategy_type: t,
            name: t.title().to_string(),
            description: t.description().to_string(),
            pros: t.pros().iter().map(|s| s.to_string()).collect(),
            cons: t.cons().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 全部可用策略
pub fn available_strategies() -> Vec<StrategyInfo> {
    StrategyType::ALL.iter().copied().map(StrategyInfo::from).collect()
}
