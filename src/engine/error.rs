// ==========================================
// 采购规划管线 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 匹配 =====
    #[error("检索服务不可用: {0}")]
    SearchUnavailable(String),

    // ===== 寻源 =====
    #[error("寻源优化失败: {0}")]
    OptimizationFailed(String),

    #[error("无候选报价: {0}")]
    NoCandidates(String),

    // ===== 排期 =====
    #[error("阶段依赖图无效: {reason}")]
    InvalidDependencyGraph {
        reason: String,
        /// 环路或问题涉及的阶段
        stages: Vec<String>,
    },

    #[error("无效的状态转换: stage={stage}, from={from} to={to}")]
    InvalidStateTransition {
        stage: String,
        from: String,
        to: String,
    },

    // ===== 通用 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("导出失败: {0}")]
    Export(String),
}

impl EngineError {
    pub fn cycle(stages: Vec<String>) -> Self {
        EngineError::InvalidDependencyGraph {
            reason: format!("检测到环路: {}", stages.join(" → ")),
            stages,
        }
    }

    pub fn unknown_stage(stage: &str, referenced_by: &str) -> Self {
        EngineError::InvalidDependencyGraph {
            reason: format!("阶段 {} 引用了不存在的阶段 {}", referenced_by, stage),
            stages: vec![referenced_by.to_string(), stage.to_string()],
        }
    }
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Export(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Export(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
