// ==========================================
// 采购规划管线 - 引擎层
// ==========================================
// 职责: 匹配 / 寻源 / 订单 / 排期 四个核心引擎
// 红线: 除匹配外均为同步纯计算,无 I/O、无共享可变状态
// 红线: 外部服务 (检索 / 摘要) 只通过 trait 接入
// ==========================================

pub mod categorizer;
pub mod error;
pub mod export;
pub mod matcher;
pub mod orders;
pub mod schedule;
pub mod sourcing;
pub mod strategy;
pub mod summary;

// 重导出核心引擎
pub use categorizer::{ItemCategorizer, KeywordCategorizer, NoOpCategorizer};
pub use error::{EngineError, EngineResult};
pub use matcher::{
    ItemMatcher, MatchBatch, MatchOutcome, SearchError, SearchHit, SearchRequest, SearchResponse,
    SemanticSearch,
};
pub use orders::{DeliveryCosts, OrderGenerator};
pub use schedule::{default_stage_templates, ScheduleBuilder, StatusChange};
pub use sourcing::SourcingOptimizer;
pub use strategy::{available_strategies, StrategyInfo, StrategyKind, StrategyType};
pub use summary::{NoOpSummarizer, OptionalSummarizer, StrategySummarizer, SummaryError};
