// ==========================================
// 采购规划管线 - 领域类型定义
// ==========================================
// 匹配状态 / 施工阶段状态 / 订单状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 匹配置信度阈值
// ==========================================
// 红线: 阈值固定,不可配置
pub const MATCHED_SCORE_THRESHOLD: f64 = 0.8;
pub const REVIEW_SCORE_THRESHOLD: f64 = 0.5;

// ==========================================
// 匹配状态 (Match Status)
// ==========================================
// 由 match_score 纯函数推导 (人工选择除外)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched, // 自动匹配成功
    Review,  // 需人工复核
    Manual,  // 需人工检索
}

impl MatchStatus {
    /// 按置信度分级
    ///
    /// - score ≥ 0.8 → Matched
    /// - 0.5 ≤ score < 0.8 → Review
    /// - score < 0.5 → Manual (含 NaN)
    pub fn classify(score: f64) -> Self {
        if score >= MATCHED_SCORE_THRESHOLD {
            MatchStatus::Matched
        } else if score >= REVIEW_SCORE_THRESHOLD {
            MatchStatus::Review
        } else {
            MatchStatus::Manual
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "matched"),
            MatchStatus::Review => write!(f, "review"),
            MatchStatus::Manual => write!(f, "manual"),
        }
    }
}

// ==========================================
// 施工阶段状态 (Stage Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    NotStarted, // 未开始
    InProgress, // 进行中
    Completed,  // 已完成
    OnHold,     // 暂停
}

impl StageStatus {
    /// 受控模式下允许的目标状态
    ///
    /// 同状态转换视为空操作,不在此列出
    pub fn allowed_targets(&self) -> &'static [StageStatus] {
        match self {
            StageStatus::NotStarted => &[StageStatus::InProgress, StageStatus::OnHold],
            StageStatus::InProgress => &[StageStatus::Completed, StageStatus::OnHold],
            StageStatus::OnHold => &[StageStatus::InProgress, StageStatus::NotStarted],
            StageStatus::Completed => &[],
        }
    }

    pub fn can_transition_to(&self, target: StageStatus) -> bool {
        *self == target || self.allowed_targets().contains(&target)
    }
}

impl Default for StageStatus {
    fn default() -> Self {
        StageStatus::NotStarted
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::NotStarted => write!(f, "not_started"),
            StageStatus::InProgress => write!(f, "in_progress"),
            StageStatus::Completed => write!(f, "completed"),
            StageStatus::OnHold => write!(f, "on_hold"),
        }
    }
}

impl std::str::FromStr for StageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not_started" | "not-started" => Ok(StageStatus::NotStarted),
            "in_progress" | "in-progress" => Ok(StageStatus::InProgress),
            "completed" => Ok(StageStatus::Completed),
            "on_hold" | "on-hold" => Ok(StageStatus::OnHold),
            other => Err(format!("未知阶段状态: {}", other)),
        }
    }
}

// ==========================================
// 订单状态 (Generated Order Status)
// ==========================================
// 顺序: Draft < Pending < Sent < Confirmed < Delivered (只进不退)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,     // 草稿
    Pending,   // 待发送
    Sent,      // 已发送
    Confirmed, // 供应商已确认
    Delivered, // 已送达
}

impl OrderStatus {
    /// 下一个状态 (Delivered 为终态)
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Draft => Some(OrderStatus::Pending),
            OrderStatus::Pending => Some(OrderStatus::Sent),
            OrderStatus::Sent => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Draft
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Draft => write!(f, "draft"),
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Sent => write!(f, "sent"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Delivered => write!(f, "delivered"),
        }
    }
}
