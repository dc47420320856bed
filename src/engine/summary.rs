// ==========================================
// 采购规划管线 - 策略摘要
// ==========================================
// 职责: 定义策略摘要 trait,摘要服务在外部实现
// 说明: 摘要为不透明字符串,只透传,不参与策略计算
// 红线: 摘要失败降级为空串,不得影响策略结果
// ==========================================

use crate::domain::sourcing::OptimizationResult;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummaryError {
    #[error("摘要服务不可用: {0}")]
    Unavailable(String),

    #[error("摘要服务返回无效内容: {0}")]
    InvalidResponse(String),
}

// ==========================================
// 摘要 Trait
// ==========================================

/// 策略摘要服务
///
/// # 实现说明
/// - 入参为已完成的优化结果 (三种策略 + 推荐)
/// - 返回自然语言摘要,内容由实现方决定
#[async_trait]
pub trait StrategySummarizer: Send + Sync {
    async fn summarize(&self, result: &OptimizationResult) -> Result<String, SummaryError>;
}

/// 空操作摘要 (始终返回空串)
#[derive(Debug, Clone, Default)]
pub struct NoOpSummarizer;

#[async_trait]
impl StrategySummarizer for NoOpSummarizer {
    async fn summarize(&self, result: &OptimizationResult) -> Result<String, SummaryError> {
        debug!(
            stage = result.stage_name.as_deref().unwrap_or("-"),
            "NoOpSummarizer: 跳过摘要"
        );
        Ok(String::new())
    }
}

/// 可选的摘要服务包装
///
/// 简化 Option<Arc<dyn StrategySummarizer>> 的使用,并统一降级逻辑
#[derive(Clone, Default)]
pub struct OptionalSummarizer {
    inner: Option<Arc<dyn StrategySummarizer>>,
}

impl OptionalSummarizer {
    pub fn with_summarizer(summarizer: Arc<dyn StrategySummarizer>) -> Self {
        Self {
            inner: Some(summarizer),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// 生成摘要;失败时记录日志并返回空串
    pub async fn summarize_or_empty(&self, result: &OptimizationResult) -> String {
        let Some(summarizer) = &self.inner else {
            return String::new();
        };

        match summarizer.summarize(result).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "策略摘要失败,降级为空摘要");
                String::new()
            }
        }
    }
}
