// ==========================================
// 采购规划管线 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含 I/O,不含引擎逻辑
// ==========================================

pub mod estimate;
pub mod schedule;
pub mod sourcing;
pub mod types;

// 重导出核心类型
pub use estimate::{EstimateItem, Product, RawEstimateItem};
pub use schedule::{
    ConstructionStage, Schedule, ScheduleItem, StageDependency, StageProgress, StageTemplate,
};
pub use sourcing::{
    Assignment, CreateOrdersRequest, CreateOrdersResponse, GeneratedOrder, GeneratedOrderItem,
    OptimizationResult, OrderLine, ProductOffer, SourcingItem, SourcingOrder, SourcingRequest,
    SourcingStrategy, StrategyComparison, StrategyComparisonDetail, SupplierProposal,
};
pub use types::{MatchStatus, OrderStatus, StageStatus};
