// ==========================================
// 采购规划管线 - 寻源优化引擎
// ==========================================
// 职责: 多供应商分配,产出三种策略 + 推荐
// 输入: 物料及各供应商候选报价
// 输出: best_price / one_stop_shop / balanced
// ==========================================
// 红线: 无报价物料必须进入 missing_items,不得静默丢弃
// 红线: 纯计算,无 I/O
// ==========================================

mod core;
mod recommend;


pub use core::{coverage_percent, SourcingOptimizer, BALANCED_CANDIDATE_LIMIT};
pub use recommend::{potential_savings, recommend};
