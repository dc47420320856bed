// ==========================================
// 采购规划管线 - 核心库
// ==========================================
// 流程: 估算行 → 匹配 → 寻源策略 → 订单
//       已匹配物料 → 施工阶段 → 依赖排期 → 进度
// 系统定位: 决策支持 (人工最终选择策略与状态)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 匹配 / 寻源 / 订单 / 排期
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 命令行定义
pub mod cli;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MatchStatus, OrderStatus, StageStatus};

// 领域实体
pub use domain::{
    ConstructionStage, EstimateItem, OptimizationResult, Product, ProductOffer, Schedule,
    SourcingOrder, SourcingStrategy, StageDependency,
};

// 引擎
pub use engine::{
    ItemMatcher, OrderGenerator, ScheduleBuilder, SourcingOptimizer, StrategyKind, StrategyType,
};

// 配置
pub use config::{ConfigManager, PlannerConfig};

// API
pub use api::{ApiError, ApiResult, PlanningApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "采购规划管线";
