use super::recommend::{potential_savings, recommend};
use crate::config::SourcingConfig;
use crate::domain::sourcing::{
    round_money, Assignment, OptimizationResult, ProductOffer, SourcingItem, SourcingRequest,
    SourcingStrategy, StrategyComparison, StrategyComparisonDetail, SupplierProposal,
};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::orders::{DeliveryCosts, OrderGenerator};
use crate::engine::strategy::{StrategyKind, StrategyType};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// 均衡策略候选池：仅在排名前 N 的供应商中组合
pub const BALANCED_CANDIDATE_LIMIT: usize = 8;

const COST_EPSILON: f64 = 1e-9;

// ==========================================
// 预处理结果
// ==========================================

/// 物料及其可用候选报价（已截断、已过滤库存）
struct Candidate<'a> {
    item: &'a SourcingItem,
    offers: Vec<&'a ProductOffer>,
}

impl<'a> Candidate<'a> {
    /// 指定供应商范围内的最低价报价
    fn cheapest_in<F>(&self, accept: F) -> Option<&'a ProductOffer>
    where
        F: Fn(&str) -> bool,
    {
        self.offers
            .iter()
            .copied()
            .filter(|o| accept(&o.supplier_name))
            .min_by(|a, b| compare_offers(a, b))
    }

    fn assign(&self, offer: &ProductOffer) -> Assignment {
        Assignment {
            item_id: self.item.item_id.clone(),
            requested_name: self.item.name.clone(),
            requested_quantity: self.item.quantity,
            unit: self.item.unit.clone(),
            offer: offer.clone(),
        }
    }
}

/// 供应商排名信息
#[derive(Debug, Clone)]
struct SupplierRank {
    name: String,
    /// 可覆盖的物料下标
    covered: Vec<usize>,
    /// 覆盖物料的最低价合计
    covered_cost: f64,
}

/// 报价优先级：单价 → 交期 → 供应商名称 → 商品 ID
fn compare_offers(a: &ProductOffer, b: &ProductOffer) -> Ordering {
    a.price
        .partial_cmp(&b.price)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.delivery_days.cmp(&b.delivery_days))
        .then_with(|| a.supplier_name.cmp(&b.supplier_name))
        .then_with(|| a.product_id.cmp(&b.product_id))
}

// ==========================================
// SourcingOptimizer - 寻源优化引擎
// ==========================================
pub struct SourcingOptimizer {
    config: SourcingConfig,
}

impl SourcingOptimizer {
    pub fn new(config: SourcingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SourcingConfig {
        &self.config
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算三种寻源策略并给出推荐
    ///
    /// # 返回
    /// - Ok(OptimizationResult): 固定三种策略（ai_summary 为空，由调用方填充）
    /// - Err(OptimizationFailed): 输入无效，不返回部分结果
    pub fn optimize(&self, request: &SourcingRequest) -> EngineResult<OptimizationResult> {
        let started = Instant::now();
        self.validate(request)?;

        let candidates = self.prepare(request);
        let delivery = self.delivery_costs(request);
        let ranking = rank_suppliers(&candidates);

        let items_requested = candidates.len();
        let items_found = candidates.iter().filter(|c| !c.offers.is_empty()).count();
        let no_candidates = items_found == 0;

        info!(
            stage = request.stage_name.as_deref().unwrap_or("-"),
            items_requested,
            items_found,
            suppliers = ranking.len(),
            "开始寻源优化"
        );
        if no_candidates {
            warn!("所有物料均无候选报价");
        }

        let generator = OrderGenerator::new(delivery.clone());
        let strategies = vec![
            self.best_price(&candidates, &generator),
            self.one_stop_shop(&candidates, &ranking, &generator),
            self.balanced(&candidates, &ranking, &delivery, &generator),
        ];

        let recommended_strategy = recommend(&strategies, self.config.recommendation_tolerance);
        let potential_savings = potential_savings(&strategies, recommended_strategy);

        for s in &strategies {
            debug!(
                strategy = %s.strategy_type(),
                suppliers = s.suppliers_count,
                coverage = s.coverage_percent,
                budget = s.total_budget,
                "策略结果"
            );
        }
        info!(
            recommended = ?recommended_strategy,
            potential_savings,
            "寻源优化完成"
        );

        Ok(OptimizationResult {
            stage_name: request.stage_name.clone(),
            items_requested,
            items_found,
            strategies,
            recommended_strategy,
            ai_summary: String::new(),
            potential_savings,
            processing_time_ms: started.elapsed().as_millis() as u64,
            no_candidates,
        })
    }

    /// 各供应商独立报价方案（覆盖率降序，总价升序）
    pub fn supplier_proposals(
        &self,
        request: &SourcingRequest,
    ) -> EngineResult<Vec<SupplierProposal>> {
        self.validate(request)?;

        let candidates = self.prepare(request);
        let delivery = self.delivery_costs(request);
        let ranking = rank_suppliers(&candidates);

        Ok(ranking
            .iter()
            .map(|rank| {
                let items: Vec<Assignment> = candidates
                    .iter()
                    .filter_map(|c| {
                        c.cheapest_in(|s| s == rank.name)
                            .map(|offer| c.assign(offer))
                    })
                    .collect();
                let covered: HashSet<&str> = items.iter().map(|a| a.item_id.as_str()).collect();
                let missing_items = candidates
                    .iter()
                    .filter(|c| !covered.contains(c.item.item_id.as_str()))
                    .map(|c| c.item.name.clone())
                    .collect();

                SupplierProposal {
                    supplier_name: rank.name.clone(),
                    total_price: round_money(items.iter().map(|a| a.line_cost()).sum()),
                    items_count: items.len(),
                    coverage_percent: coverage_percent(items.len(), candidates.len()),
                    missing_items,
                    delivery_cost: round_money(delivery.cost_for(&rank.name)),
                    items,
                }
            })
            .collect())
    }

    /// 下单前检查:全部物料无报价时返回 NoCandidates
    pub fn require_candidates(result: &OptimizationResult) -> EngineResult<()> {
        if result.no_candidates {
            return Err(EngineError::NoCandidates(format!(
                "{} 项物料均无供应商报价",
                result.items_requested
            )));
        }
        Ok(())
    }

    /// 策略快速对比
    pub fn compare(result: &OptimizationResult) -> StrategyComparison {
        let details: Vec<StrategyComparisonDetail> = result
            .strategies
            .iter()
            .map(|s| StrategyComparisonDetail {
                name: s.strategy_name.clone(),
                strategy_type: s.strategy_type(),
                total_budget: s.total_budget,
                suppliers_count: s.suppliers_count,
                coverage_percent: s.coverage_percent,
            })
            .collect();

        let summary = match result.recommended() {
            Some(s) => format!(
                "推荐「{}」: 覆盖 {:.0}%, 供应商 {} 家, 预算 {:.2}, 可节省 {:.2}",
                s.strategy_name,
                s.coverage_percent,
                s.suppliers_count,
                s.total_budget,
                result.potential_savings
            ),
            None => "无可用报价，无法给出推荐".to_string(),
        };

        StrategyComparison {
            stage_name: result.stage_name.clone(),
            items_count: result.items_requested,
            strategies_found: result
                .strategies
                .iter()
                .filter(|s| !s.orders.is_empty())
                .count(),
            recommended: result.recommended_strategy,
            potential_savings: result.potential_savings,
            summary,
            details,
        }
    }

    // ==========================================
    // 三种策略
    // ==========================================

    /// 最低价：逐物料取最低价报价
    fn best_price(
        &self,
        candidates: &[Candidate<'_>],
        generator: &OrderGenerator,
    ) -> SourcingStrategy {
        let assignments = candidates
            .iter()
            .filter_map(|c| c.cheapest_in(|_| true).map(|o| c.assign(o)))
            .collect();
        build_strategy(StrategyKind::BestPrice, candidates, assignments, generator)
    }

    /// 一站式：覆盖面最广的单一供应商
    fn one_stop_shop(
        &self,
        candidates: &[Candidate<'_>],
        ranking: &[SupplierRank],
        generator: &OrderGenerator,
    ) -> SourcingStrategy {
        let supplier = ranking.first().map(|r| r.name.clone());

        let assignments = match &supplier {
            Some(name) => candidates
                .iter()
                .filter_map(|c| c.cheapest_in(|s| s == name.as_str()).map(|o| c.assign(o)))
                .collect(),
            None => Vec::new(),
        };

        build_strategy(
            StrategyKind::OneStopShop { supplier },
            candidates,
            assignments,
            generator,
        )
    }

    /// 均衡：在至多 balanced_max_suppliers 家供应商内，覆盖优先、预算其次
    ///
    /// 池内逐物料取 单价×数量 + 分摊配送费 最小的报价
    fn balanced(
        &self,
        candidates: &[Candidate<'_>],
        ranking: &[SupplierRank],
        delivery: &DeliveryCosts,
        generator: &OrderGenerator,
    ) -> SourcingStrategy {
        let pool_limit = self.config.balanced_max_suppliers.max(1);
        let shortlist: Vec<&SupplierRank> = ranking.iter().take(BALANCED_CANDIDATE_LIMIT).collect();

        let mut best: Option<SourcingStrategy> = None;
        for size in 1..=pool_limit.min(shortlist.len()) {
            for pool in combinations(&shortlist, size) {
                let assignments = assign_within_pool(candidates, &pool, delivery);
                let names = pool.iter().map(|r| r.name.clone()).collect();
                let strategy = build_strategy(
                    StrategyKind::Balanced { supplier_pool: names },
                    candidates,
                    assignments,
                    generator,
                );

                let better = match &best {
                    None => true,
                    Some(current) => balanced_is_better(&strategy, current),
                };
                if better {
                    best = Some(strategy);
                }
            }
        }

        match best {
            Some(strategy) => strategy,
            None => build_strategy(
                StrategyKind::Balanced {
                    supplier_pool: Vec::new(),
                },
                candidates,
                Vec::new(),
                generator,
            ),
        }
    }

    // ==========================================
    // 输入处理
    // ==========================================

    fn validate(&self, request: &SourcingRequest) -> EngineResult<()> {
        let fail = |msg: String| Err(EngineError::OptimizationFailed(msg));

        if request.items.is_empty() {
            return fail("物料列表为空".to_string());
        }
        if let Some(cost) = request.delivery_cost_estimate {
            if !cost.is_finite() || cost < 0.0 {
                return fail(format!("配送费估算无效: {}", cost));
            }
        }
        for (supplier, cost) in &request.supplier_delivery_costs {
            if !cost.is_finite() || *cost < 0.0 {
                return fail(format!("供应商 {} 配送费无效: {}", supplier, cost));
            }
        }
        if request.max_candidates_per_item == Some(0) {
            return fail("每物料候选数必须 ≥ 1".to_string());
        }

        let mut seen = HashSet::new();
        for item in &request.items {
            if !seen.insert(item.item_id.as_str()) {
                return fail(format!("物料 ID 重复: {}", item.item_id));
            }
            if !item.quantity.is_finite() || item.quantity <= 0.0 {
                return fail(format!("物料 {} 数量无效: {}", item.name, item.quantity));
            }
            for offer in &item.offers {
                if !offer.price.is_finite() || offer.price < 0.0 {
                    return fail(format!(
                        "物料 {} 的报价 {} 单价无效: {}",
                        item.name, offer.product_id, offer.price
                    ));
                }
            }
        }

        Ok(())
    }

    fn prepare<'a>(&self, request: &'a SourcingRequest) -> Vec<Candidate<'a>> {
        let cap = request
            .max_candidates_per_item
            .unwrap_or(self.config.max_candidates_per_item)
            .max(1);

        request
            .items
            .iter()
            .map(|item| {
                let offers: Vec<&ProductOffer> = item
                    .offers
                    .iter()
                    .filter(|o| {
                        !self.config.respect_stock
                            || o.stock.map_or(true, |stock| stock >= item.quantity)
                    })
                    .take(cap)
                    .collect();
                if offers.is_empty() {
                    debug!(item = %item.name, "物料无候选报价");
                }
                Candidate { item, offers }
            })
            .collect()
    }

    fn delivery_costs(&self, request: &SourcingRequest) -> DeliveryCosts {
        DeliveryCosts {
            default_cost: request
                .delivery_cost_estimate
                .unwrap_or(self.config.delivery_cost_estimate),
            per_supplier: request.supplier_delivery_costs.clone(),
        }
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 覆盖率，限定在 [0, 100]
pub fn coverage_percent(found: usize, requested: usize) -> f64 {
    if requested == 0 {
        return 0.0;
    }
    (found as f64 / requested as f64 * 100.0).clamp(0.0, 100.0)
}

/// 供应商排名：覆盖数降序 → 覆盖成本升序 → 名称
fn rank_suppliers(candidates: &[Candidate<'_>]) -> Vec<SupplierRank> {
    let mut ranks: HashMap<&str, SupplierRank> = HashMap::new();

    for (idx, candidate) in candidates.iter().enumerate() {
        let suppliers: HashSet<&str> = candidate
            .offers
            .iter()
            .map(|o| o.supplier_name.as_str())
            .collect();
        for supplier in suppliers {
            let cheapest = candidate
                .cheapest_in(|s| s == supplier)
                .map(|o| o.price * candidate.item.quantity)
                .unwrap_or(0.0);
            let rank = ranks.entry(supplier).or_insert_with(|| SupplierRank {
                name: supplier.to_string(),
                covered: Vec::new(),
                covered_cost: 0.0,
            });
            rank.covered.push(idx);
            rank.covered_cost += cheapest;
        }
    }

    let mut ranking: Vec<SupplierRank> = ranks.into_values().collect();
    ranking.sort_by(|a, b| {
        b.covered
            .len()
            .cmp(&a.covered.len())
            .then_with(|| {
                a.covered_cost
                    .partial_cmp(&b.covered_cost)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.name.cmp(&b.name))
    });
    ranking
}

/// 池内分配：单价×数量 + 配送费/池内覆盖数，平局按报价优先级
fn assign_within_pool(
    candidates: &[Candidate<'_>],
    pool: &[&SupplierRank],
    delivery: &DeliveryCosts,
) -> Vec<Assignment> {
    let shares: HashMap<&str, f64> = pool
        .iter()
        .map(|r| {
            let share = delivery.cost_for(&r.name) / r.covered.len().max(1) as f64;
            (r.name.as_str(), share)
        })
        .collect();

    candidates
        .iter()
        .filter_map(|c| {
            c.offers
                .iter()
                .copied()
                .filter_map(|o| {
                    shares
                        .get(o.supplier_name.as_str())
                        .map(|share| (o, o.price * c.item.quantity + share))
                })
                .min_by(|(a, cost_a), (b, cost_b)| {
                    cost_a
                        .partial_cmp(cost_b)
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| compare_offers(a, b))
                })
                .map(|(offer, _)| c.assign(offer))
        })
        .collect()
}

/// 覆盖率高者优先；其次预算低；再次供应商少
fn balanced_is_better(candidate: &SourcingStrategy, current: &SourcingStrategy) -> bool {
    if (candidate.coverage_percent - current.coverage_percent).abs() > COST_EPSILON {
        return candidate.coverage_percent > current.coverage_percent;
    }
    if (candidate.total_budget - current.total_budget).abs() > COST_EPSILON {
        return candidate.total_budget < current.total_budget;
    }
    candidate.suppliers_count < current.suppliers_count
}

/// 按字典序枚举 size 元组合
fn combinations<'a, T>(items: &[&'a T], size: usize) -> Vec<Vec<&'a T>> {
    fn walk<'a, T>(
        items: &[&'a T],
        size: usize,
        start: usize,
        current: &mut Vec<&'a T>,
        out: &mut Vec<Vec<&'a T>>,
    ) {
        if current.len() == size {
            out.push(current.clone());
            return;
        }
        for i in start..items.len() {
            current.push(items[i]);
            walk(items, size, i + 1, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if size == 0 || size > items.len() {
        return out;
    }
    walk(items, size, 0, &mut Vec::with_capacity(size), &mut out);
    out
}

fn build_strategy(
    kind: StrategyKind,
    candidates: &[Candidate<'_>],
    assignments: Vec<Assignment>,
    generator: &OrderGenerator,
) -> SourcingStrategy {
    let strategy_type: StrategyType = kind.strategy_type();
    let assigned: HashSet<&str> = assignments.iter().map(|a| a.item_id.as_str()).collect();
    let missing_items: Vec<String> = candidates
        .iter()
        .filter(|c| !assigned.contains(c.item.item_id.as_str()))
        .map(|c| c.item.name.clone())
        .collect();

    let orders = generator.generate(&assignments);
    let total_items_cost = round_money(orders.iter().map(|o| o.subtotal).sum());
    let total_delivery_cost = round_money(orders.iter().map(|o| o.delivery_cost).sum());

    SourcingStrategy {
        strategy_name: strategy_type.title().to_string(),
        description: strategy_type.description().to_string(),
        suppliers_count: orders.len(),
        coverage_percent: coverage_percent(
            candidates.len() - missing_items.len(),
            candidates.len(),
        ),
        total_items_cost,
        total_delivery_cost,
        total_budget: round_money(total_items_cost + total_delivery_cost),
        missing_items,
        orders,
        assignments,
        kind,
    }
}
