use super::search::{SearchError, SearchRequest, SearchResponse, SemanticSearch};
use crate::config::MatcherConfig;
use crate::domain::estimate::{EstimateItem, Product};
use crate::domain::types::MatchStatus;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 质量分归一到 [0, 1]，NaN 视为 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// 单条匹配结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub matched_product: Option<Product>,
    pub alternatives: Vec<Product>,
    pub match_score: f64,
}

impl MatchOutcome {
    pub fn status(&self) -> MatchStatus {
        MatchStatus::classify(self.match_score)
    }
}

/// 批量匹配结果（items 与输入同序）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBatch {
    pub items: Vec<EstimateItem>,
    pub processing_time_ms: u64,
    pub matched_count: usize,
    pub review_count: usize,
    pub manual_count: usize,
    /// 检索失败/超时而降级的物料
    pub failed_item_ids: Vec<String>,
    /// 批次被取消时，未完成的物料保持原状
    pub cancelled: bool,
}

impl MatchBatch {
    fn new(
        items: Vec<EstimateItem>,
        started: Instant,
        failed: Vec<String>,
        cancelled: bool,
    ) -> Self {
        let count = |s: MatchStatus| items.iter().filter(|i| i.status == s).count();
        let matched_count = count(MatchStatus::Matched);
        let review_count = count(MatchStatus::Review);
        let manual_count = count(MatchStatus::Manual);

        Self {
            items,
            processing_time_ms: started.elapsed().as_millis() as u64,
            matched_count,
            review_count,
            manual_count,
            failed_item_ids: failed,
            cancelled,
        }
    }
}

// ==========================================
// ItemMatcher - 物料匹配器
// ==========================================
pub struct ItemMatcher {
    search: Arc<dyn SemanticSearch>,
    config: MatcherConfig,
}

impl ItemMatcher {
    pub fn new(search: Arc<dyn SemanticSearch>, config: MatcherConfig) -> Self {
        Self { search, config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    // ==========================================
    // 单条匹配
    // ==========================================

    /// 匹配单条文本
    ///
    /// 首个候选为最佳匹配，其余为备选（合计不超过 top_k）
    pub async fn match_item(&self, text: &str) -> Result<MatchOutcome, SearchError> {
        let response = self
            .search
            .search(SearchRequest::first_page(text, self.config.top_k))
            .await?;
        Ok(self.outcome_from_response(response))
    }

    /// 将检索响应转换为匹配结果
    pub fn outcome_from_response(&self, response: SearchResponse) -> MatchOutcome {
        let mut hits = response.hits.into_iter().take(self.config.top_k);

        let Some(best) = hits.next() else {
            return MatchOutcome::default();
        };

        let score = best.score.unwrap_or(self.config.missing_score_default);

        MatchOutcome {
            matched_product: Some(best.product),
            alternatives: hits.map(|h| h.product).collect(),
            match_score: clamp_score(score),
        }
    }

    // ==========================================
    // 批量匹配
    // ==========================================

    /// 批量匹配全部物料
    ///
    /// - 并发上限 max_concurrency，单条超时 item_timeout_ms
    /// - 输出顺序与输入一致
    /// - 单条失败降级为 score=0 / manual，不中断批次
    pub async fn match_all(
        &self,
        items: Vec<EstimateItem>,
        cancel: &CancellationToken,
    ) -> MatchBatch {
        self.run_batch(items, None, cancel).await
    }

    /// 仅匹配指定 id 的物料，其余原样返回
    pub async fn match_selected(
        &self,
        items: Vec<EstimateItem>,
        item_ids: &[String],
        cancel: &CancellationToken,
    ) -> MatchBatch {
        let selected: HashSet<&str> = item_ids.iter().map(|s| s.as_str()).collect();
        self.run_batch(items, Some(&selected), cancel).await
    }

    async fn run_batch(
        &self,
        mut items: Vec<EstimateItem>,
        selected: Option<&HashSet<&str>>,
        cancel: &CancellationToken,
    ) -> MatchBatch {
        let started = Instant::now();
        let timeout = Duration::from_millis(self.config.item_timeout_ms);
        // 并发度为 0 时流永不推进
        let concurrency = self.config.max_concurrency.max(1);

        let targets: Vec<(usize, String)> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| selected.map_or(true, |ids| ids.contains(item.id.as_str())))
            .map(|(idx, item)| (idx, item.original_text.clone()))
            .collect();

        info!(
            total = items.len(),
            targets = targets.len(),
            max_concurrency = concurrency,
            "开始批量匹配"
        );

        // 按输入下标回填，完成顺序不影响输出顺序
        let mut slots: Vec<Option<Result<MatchOutcome, SearchError>>> =
            (0..items.len()).map(|_| None).collect();

        let mut pending = stream::iter(targets.into_iter().map(|(idx, text)| async move {
            let result = match tokio::time::timeout(timeout, self.match_item(&text)).await {
                Ok(result) => result,
                Err(_) => Err(SearchError::Timeout(timeout.as_millis() as u64)),
            };
            (idx, result)
        }))
        .buffer_unordered(concurrency);

        let mut cancelled = false;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = pending.next() => match next {
                    Some((idx, result)) => slots[idx] = Some(result),
                    None => break,
                },
            }
        }
        // 丢弃未完成的调用
        drop(pending);

        let mut failed = Vec::new();
        for (item, slot) in items.iter_mut().zip(slots) {
            match slot {
                Some(Ok(outcome)) => {
                    debug!(item_id = %item.id, score = outcome.match_score, "匹配完成");
                    apply_outcome(item, outcome);
                }
                Some(Err(e)) => {
                    warn!(
                        item_id = %item.id,
                        text = %item.original_text,
                        error = %e,
                        "匹配失败，降级为人工处理"
                    );
                    item.degrade_to_manual();
                    failed.push(item.id.clone());
                }
                None => {}
            }
        }

        if cancelled {
            warn!("批量匹配已取消，未完成的物料保持原状");
        }

        let batch = MatchBatch::new(items, started, failed, cancelled);
        info!(
            matched = batch.matched_count,
            review = batch.review_count,
            manual = batch.manual_count,
            failed = batch.failed_item_ids.len(),
            elapsed_ms = batch.processing_time_ms,
            "批量匹配完成"
        );
        batch
    }

    // ==========================================
    // 人工检索与选择
    // ==========================================

    /// 人工自由文本检索
    ///
    /// 查询过短时直接返回空列表，不调用检索服务
    pub async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Product>, SearchError> {
        let query = query.trim();
        if query.chars().count() < self.config.min_query_len {
            debug!(query, "查询过短，跳过检索");
            return Ok(Vec::new());
        }

        let response = self
            .search
            .search(SearchRequest::first_page(query, limit.max(1)))
            .await?;
        Ok(response.hits.into_iter().map(|h| h.product).collect())
    }

    /// 人工选择商品：视为已确认匹配
    pub fn select_product(item: &mut EstimateItem, product: Product, alternatives: Vec<Product>) {
        info!(item_id = %item.id, product_id = %product.id, "人工选择商品");
        item.matched_product = Some(product);
        item.alternatives = alternatives;
        item.match_score = 1.0;
        item.status = MatchStatus::Matched;
        item.manually_selected = true;
    }
}

fn apply_outcome(item: &mut EstimateItem, outcome: MatchOutcome) {
    item.status = outcome.status();
    item.matched_product = outcome.matched_product;
    item.alternatives = outcome.alternatives;
    item.match_score = outcome.match_score;
    item.manually_selected = false;
}
