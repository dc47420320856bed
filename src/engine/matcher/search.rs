// ==========================================
// 采购规划管线 - 语义检索协作方接口
// ==========================================
// 职责: 定义外部语义检索服务的调用契约（不包含实现）
// 实现者: 宿主应用的 HTTP 客户端 / 测试桩
// ==========================================

use crate::domain::estimate::Product;
use crate::engine::error::EngineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 检索请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: usize,
    pub per_page: usize,
}

impl SearchRequest {
    pub fn first_page(query: impl Into<String>, per_page: usize) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_page,
        }
    }
}

/// 单条检索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub product: Product,
    /// 检索服务给出的质量分（可能缺失或越界）
    #[serde(default)]
    pub score: Option<f64>,
}

/// 检索响应（已按相关度排序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub total: usize,
}

/// 检索错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("检索服务不可用: {0}")]
    Unavailable(String),

    #[error("检索超时 ({0}ms)")]
    Timeout(u64),

    #[error("检索响应无效: {0}")]
    InvalidResponse(String),
}

impl From<SearchError> for EngineError {
    fn from(err: SearchError) -> Self {
        EngineError::SearchUnavailable(err.to_string())
    }
}

// ==========================================
// SemanticSearch Trait
// ==========================================
#[async_trait]
pub trait SemanticSearch: Send + Sync {
    /// 按文本检索商品
    ///
    /// # 返回
    /// - Ok(SearchResponse): 排序后的候选（可能为空）
    /// - Err(SearchError): 服务错误
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError>;
}
