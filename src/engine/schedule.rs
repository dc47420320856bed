// ==========================================
// 采购规划管线 - 施工排期引擎
// ==========================================
// 职责: 物料归入施工阶段,维护依赖图,计算相对开工周
// 输入: 已匹配物料 + 阶段模板
// 输出: Schedule (阶段 / 依赖 / 未分类物料)
// ==========================================
// 红线: 未分类物料保留,不得丢弃
// 红线: 依赖图有环时拒绝构建
// ==========================================

mod catalog;
mod core;
mod graph;
mod progress;


pub use catalog::{
    default_stage_templates, STAGE_ENGINEERING, STAGE_FINISHING, STAGE_FOUNDATION,
    STAGE_LANDSCAPING, STAGE_PREPARATION, STAGE_ROOFING, STAGE_ROUGH_WORK,
};
pub use core::{ScheduleBuilder, DEFAULT_UNIT};
pub use graph::{topological_order, validate_dependency_graph};
pub use progress::{change_status, update_progress, StatusChange};
