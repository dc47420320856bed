// ==========================================
// Mock 外部协作方 - 检索 / 摘要
// ==========================================

use async_trait::async_trait;
use procurement_planner::domain::sourcing::OptimizationResult;
use procurement_planner::engine::matcher::{
    SearchError, SearchHit, SearchRequest, SearchResponse, SemanticSearch,
};
use procurement_planner::engine::summary::{StrategySummarizer, SummaryError};
use procurement_planner::Product;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ==========================================
// MockSearch
// ==========================================

#[derive(Debug, Clone)]
enum Reply {
    Hits {
        products: Vec<Product>,
        score: Option<f64>,
        delay_ms: u64,
    },
    Fail,
}

/// 按查询文本返回预设结果,未登记的查询返回空结果
#[derive(Debug, Default)]
pub struct MockSearch {
    replies: HashMap<String, Reply>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(mut self, query: &str, products: Vec<Product>, score: Option<f64>) -> Self {
        self.replies.insert(
            query.to_string(),
            Reply::Hits {
                products,
                score,
                delay_ms: 0,
            },
        );
        self
    }

    pub fn slow_hits(
        mut self,
        query: &str,
        products: Vec<Product>,
        score: f64,
        delay_ms: u64,
    ) -> Self {
        self.replies.insert(
            query.to_string(),
            Reply::Hits {
                products,
                score: Some(score),
                delay_ms,
            },
        );
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.replies.insert(query.to_string(), Reply::Fail);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SemanticSearch for MockSearch {
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(request.query.clone());

        match self.replies.get(&request.query).cloned() {
            Some(Reply::Hits {
                products,
                score,
                delay_ms,
            }) => {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                let hits: Vec<SearchHit> = products
                    .into_iter()
                    .take(request.per_page)
                    .map(|product| SearchHit { product, score })
                    .collect();
                Ok(SearchResponse {
                    total: hits.len(),
                    hits,
                })
            }
            Some(Reply::Fail) => Err(SearchError::Unavailable("mock outage".to_string())),
            None => Ok(SearchResponse::default()),
        }
    }
}

// ==========================================
// MockSummarizer
// ==========================================

/// 固定返回摘要文本,或固定失败
pub struct MockSummarizer {
    reply: Result<String, SummaryError>,
    calls: AtomicUsize,
}

impl MockSummarizer {
    pub fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(SummaryError::Unavailable("mock outage".to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StrategySummarizer for MockSummarizer {
    async fn summarize(&self, _result: &OptimizationResult) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}
