// ==========================================
// 采购规划管线 - 物料匹配引擎
// ==========================================
// 职责: 估算行 → 目录商品 (最佳匹配 + 备选 + 置信度)
// 输入: 估算行列表
// 输出: 同序估算行 (matched / review / manual)
// ==========================================
// 红线: 单条失败只降级该条,不中断批次
// ==========================================

mod core;
mod search;


pub use core::{clamp_score, ItemMatcher, MatchBatch, MatchOutcome};
pub use search::{SearchError, SearchHit, SearchRequest, SearchResponse, SemanticSearch};
