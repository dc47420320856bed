// ==========================================
// 采购规划管线 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,将引擎错误转换为调用方可读的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::EngineError;
use crate::engine::matcher::SearchError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 外部服务错误
    // ==========================================
    #[error("检索服务不可用: {0}")]
    SearchUnavailable(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("寻源优化失败: {0}")]
    OptimizationFailed(String),

    #[error("阶段依赖图无效: {reason}")]
    InvalidDependencyGraph { reason: String, stages: Vec<String> },

    #[error("无效的状态转换: stage={stage}, from={from} to={to}")]
    InvalidStateTransition {
        stage: String,
        from: String,
        to: String,
    },

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 配置与导出
    // ==========================================
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导出失败: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::SearchUnavailable(msg) => ApiError::SearchUnavailable(msg),
            EngineError::OptimizationFailed(msg) => ApiError::OptimizationFailed(msg),
            // 单个物料无报价只记入 missing_items,走到这里说明调用方要求必须有报价
            EngineError::NoCandidates(msg) => {
                ApiError::OptimizationFailed(format!("无候选报价: {}", msg))
            }
            EngineError::InvalidDependencyGraph { reason, stages } => {
                ApiError::InvalidDependencyGraph { reason, stages }
            }
            EngineError::InvalidStateTransition { stage, from, to } => {
                ApiError::InvalidStateTransition { stage, from, to }
            }
            EngineError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            EngineError::NotFound(msg) => ApiError::NotFound(msg),
            EngineError::Export(msg) => ApiError::Export(msg),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::SearchUnavailable(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
