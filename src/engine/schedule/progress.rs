// ==========================================
// 阶段进度与状态
// ==========================================
// 受控状态机:
//   not_started → in_progress | on_hold
//   in_progress → completed | on_hold
//   on_hold     → in_progress | not_started
// 进入 in_progress 需要全部前置阶段已完成
// override = true 时允许任意转换 (人工强制)
// ==========================================

use crate::domain::schedule::{Schedule, StageProgress};
use crate::domain::types::StageStatus;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 状态变更结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub stage_name: String,
    pub from: StageStatus,
    pub to: StageStatus,
    /// 通过强制模式完成
    pub overridden: bool,
}

impl StatusChange {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// 更新阶段进度
///
/// completed_items 不得超过 total_items;notes 为 None 时保留原备注
pub fn update_progress(
    schedule: &mut Schedule,
    stage_name: &str,
    completed_items: usize,
    notes: Option<String>,
) -> EngineResult<StageProgress> {
    let stage = schedule
        .stage_mut(stage_name)
        .ok_or_else(|| EngineError::NotFound(format!("施工阶段: {}", stage_name)))?;

    let total_items = stage.progress.total_items;
    if completed_items > total_items {
        return Err(EngineError::InvalidInput(format!(
            "阶段 {} 完成数 {} 超过物料总数 {}",
            stage_name, completed_items, total_items
        )));
    }

    stage.progress.completed_items = completed_items;
    stage.progress.percent_complete = StageProgress::percent(completed_items, total_items);
    if notes.is_some() {
        stage.progress.notes = notes;
    }

    info!(
        stage = stage_name,
        completed_items,
        total_items,
        percent = stage.progress.percent_complete,
        "更新阶段进度"
    );
    Ok(stage.progress.clone())
}

/// 变更阶段状态
pub fn change_status(
    schedule: &mut Schedule,
    stage_name: &str,
    target: StageStatus,
    allow_override: bool,
) -> EngineResult<StatusChange> {
    let stage = schedule
        .stage(stage_name)
        .ok_or_else(|| EngineError::NotFound(format!("施工阶段: {}", stage_name)))?;
    let from = stage.status;

    if from == target {
        return Ok(StatusChange {
            stage_name: stage_name.to_string(),
            from,
            to: target,
            overridden: false,
        });
    }

    let rejected = || EngineError::InvalidStateTransition {
        stage: stage_name.to_string(),
        from: from.to_string(),
        to: target.to_string(),
    };

    let mut overridden = false;
    if !from.can_transition_to(target) {
        if !allow_override {
            return Err(rejected());
        }
        overridden = true;
    }

    if target == StageStatus::InProgress {
        let blocking: Vec<&str> = stage
            .predecessors
            .iter()
            .filter(|p| {
                schedule
                    .stage(p)
                    .map_or(false, |s| s.status != StageStatus::Completed)
            })
            .map(|p| p.as_str())
            .collect();

        if !blocking.is_empty() {
            if !allow_override {
                warn!(stage = stage_name, blocking = ?blocking, "前置阶段未完成,拒绝开工");
                return Err(rejected());
            }
            overridden = true;
        }
    }

    if overridden {
        warn!(stage = stage_name, %from, to = %target, "强制变更阶段状态");
    }

    if let Some(stage) = schedule.stage_mut(stage_name) {
        stage.status = target;
    }
    info!(stage = stage_name, %from, to = %target, "阶段状态变更");

    Ok(StatusChange {
        stage_name: stage_name.to_string(),
        from,
        to: target,
        overridden,
    })
}
