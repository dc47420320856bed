// ==========================================
// 策略推荐
// ==========================================
// 规则:
// 1) 均衡策略覆盖率 ≥ 容差 × 最佳覆盖率,且预算不是最差 → 推荐均衡
// 2) 否则推荐覆盖率最高者,平局取预算低者
// 3) 全部无覆盖 → 无推荐
// ==========================================

use crate::domain::sourcing::{round_money, SourcingStrategy};
use crate::engine::strategy::StrategyType;
use std::cmp::Ordering;

const EPSILON: f64 = 1e-9;

pub fn recommend(strategies: &[SourcingStrategy], tolerance: f64) -> Option<StrategyType> {
    let best_coverage = strategies
        .iter()
        .map(|s| s.coverage_percent)
        .fold(0.0_f64, f64::max);
    if best_coverage <= EPSILON {
        return None;
    }

    if let Some(balanced) = strategies
        .iter()
        .find(|s| s.strategy_type() == StrategyType::Balanced)
    {
        let others_worst = strategies
            .iter()
            .filter(|s| s.strategy_type() != StrategyType::Balanced)
            .map(|s| s.total_budget)
            .fold(f64::NEG_INFINITY, f64::max);
        let within_tolerance = balanced.coverage_percent + EPSILON >= tolerance * best_coverage;
        let is_worst = balanced.total_budget > others_worst + EPSILON;

        if within_tolerance && !is_worst {
            return Some(StrategyType::Balanced);
        }
    }

    strategies
        .iter()
        .min_by(|a, b| {
            b.coverage_percent
                .partial_cmp(&a.coverage_percent)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.total_budget
                        .partial_cmp(&b.total_budget)
                        .unwrap_or(Ordering::Equal)
                })
        })
        .map(|s| s.strategy_type())
}

/// 可节省金额 = 最高预算 − 推荐策略预算（不小于 0）
pub fn potential_savings(
    strategies: &[SourcingStrategy],
    recommended: Option<StrategyType>,
) -> f64 {
    let Some(chosen) = recommended.and_then(|t| strategies.iter().find(|s| s.strategy_type() == t))
    else {
        return 0.0;
    };

    let max_budget = strategies
        .iter()
        .map(|s| s.total_budget)
        .fold(0.0_f64, f64::max);
    round_money((max_budget - chosen.total_budget).max(0.0))
}
