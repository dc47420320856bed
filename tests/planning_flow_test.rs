// ==========================================
// 规划全流程集成测试
// ==========================================
// 流程: 估算行 → 批量匹配 → 寻源优化 → 订单 → 施工排期
// ==========================================

mod helpers;

use helpers::mock_services::{MockSearch, MockSummarizer};
use helpers::test_data_builder::*;
use procurement_planner::domain::sourcing::CreateOrdersRequest;
use procurement_planner::engine::schedule::STAGE_FOUNDATION;
use procurement_planner::{
    MatchStatus, OrderStatus, PlanningApi, PlannerConfig, StrategyKind, StrategyType,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const CEMENT_TEXT: &str = "Цемент М500 50кг";
const REBAR_TEXT: &str = "Арматура 12мм";
const UNKNOWN_TEXT: &str = "Неизвестный материал";

fn catalog_search() -> MockSearch {
    let cement_a = ProductBuilder::new("cement-a")
        .name("Cement M500 (A)")
        .supplier("A")
        .price(520.0)
        .category("foundation")
        .build();
    let cement_b = ProductBuilder::new("cement-b")
        .name("Cement M500 (B)")
        .supplier("B")
        .price(450.0)
        .category("foundation")
        .build();
    let rebar_c = ProductBuilder::new("rebar-c")
        .name("Rebar A500C 12mm")
        .supplier("C")
        .price(50.0)
        .build();
    let rebar_a = ProductBuilder::new("rebar-a")
        .name("Rebar 12mm (A)")
        .supplier("A")
        .price(60.0)
        .build();

    MockSearch::new()
        .hits(CEMENT_TEXT, vec![cement_a, cement_b], Some(0.92))
        .hits(REBAR_TEXT, vec![rebar_c, rebar_a], Some(0.6))
}

fn estimate() -> Vec<procurement_planner::EstimateItem> {
    vec![
        estimate_item("1", CEMENT_TEXT, 150.0, "мешок"),
        estimate_item("2", REBAR_TEXT, 200.0, "м"),
        estimate_item("3", UNKNOWN_TEXT, 5.0, "шт"),
    ]
}

#[tokio::test]
async fn test_full_planning_flow() {
    let api = PlanningApi::new(
        Arc::new(catalog_search()),
        Some(Arc::new(MockSummarizer::ok("Баланс выгоднее"))),
        PlannerConfig::default(),
    );

    // 1. 匹配
    let batch = api
        .match_items(estimate(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(!batch.cancelled);
    assert_eq!(batch.matched_count, 1);
    assert_eq!(batch.review_count, 1);
    assert_eq!(batch.manual_count, 1);
    let ids: Vec<&str> = batch.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(batch.items[0].status, MatchStatus::Matched);
    assert_eq!(
        batch.items[0].matched_product.as_ref().unwrap().id,
        "cement-a"
    );
    assert_eq!(batch.items[0].alternatives.len(), 1);
    assert_eq!(batch.items[1].status, MatchStatus::Review);
    assert!(batch.items[2].matched_product.is_none());

    // 2. 寻源
    let result = api
        .optimize_items(Some("Фундамент".to_string()), &batch.items)
        .await
        .unwrap();
    assert_eq!(result.items_requested, 3);
    assert_eq!(result.items_found, 2);
    assert_eq!(result.strategies.len(), 3);
    assert_eq!(result.recommended_strategy, Some(StrategyType::Balanced));
    assert_eq!(result.ai_summary, "Баланс выгоднее");
    assert_eq!(result.potential_savings, 11000.0);

    let best = result.strategy(StrategyType::BestPrice).unwrap();
    assert_eq!(best.total_budget, 80500.0);
    assert_eq!(best.missing_items, vec![UNKNOWN_TEXT.to_string()]);
    assert!((best.coverage_percent - 200.0 / 3.0).abs() < 1e-9);

    let one_stop = result.strategy(StrategyType::OneStopShop).unwrap();
    assert_eq!(
        one_stop.kind,
        StrategyKind::OneStopShop {
            supplier: Some("A".to_string())
        }
    );
    assert_eq!(one_stop.total_budget, 91500.0);

    // 3. 订单
    let orders = api
        .orders_for_strategy(&result, StrategyType::Balanced)
        .unwrap();
    let suppliers: Vec<&str> = orders.iter().map(|o| o.supplier_name.as_str()).collect();
    assert_eq!(suppliers, vec!["B", "C"]);

    let created = api
        .create_orders(CreateOrdersRequest {
            strategy_type: StrategyType::Balanced,
            stage_name: result.stage_name.clone(),
            orders,
            notes: Some("до пятницы".to_string()),
        })
        .unwrap();
    assert_eq!(created.total_orders, 2);
    assert_eq!(created.total_budget, 80500.0);
    assert!(created
        .orders
        .iter()
        .all(|o| o.status == OrderStatus::Draft && o.total == o.subtotal + o.delivery_cost));

    // 4. 排期
    let schedule = api
        .build_schedule_from_estimate(Some("Дом".to_string()), &batch.items)
        .unwrap();
    assert_eq!(schedule.stages_count, 1);
    assert_eq!(schedule.stages[0].stage_name, STAGE_FOUNDATION);
    assert_eq!(schedule.stages[0].items.len(), 2);
    assert_eq!(schedule.uncategorized_count, 1);
    assert_eq!(schedule.total_items, 3);
    assert_eq!(schedule.total_duration_weeks, 3);
}

#[tokio::test]
async fn test_manual_selection_feeds_sourcing() {
    let api = PlanningApi::new(
        Arc::new(catalog_search()),
        None,
        PlannerConfig::default(),
    );
    let mut items = estimate();

    let found = api.search_products(CEMENT_TEXT, 5).await.unwrap();
    assert_eq!(found.len(), 2);

    let chosen = found[1].clone();
    api.select_product(&mut items, "3", chosen, Vec::new())
        .unwrap();
    assert_eq!(items[2].match_score, 1.0);
    assert_eq!(items[2].status, MatchStatus::Matched);
    assert!(items[2].manually_selected);

    // 其余未匹配,仅人工选择的物料有报价
    let result = api.optimize_items(None, &items).await.unwrap();
    assert_eq!(result.items_found, 1);
    assert!(result.ai_summary.is_empty());
    let best = result.strategy(StrategyType::BestPrice).unwrap();
    assert_eq!(best.orders.len(), 1);
    assert_eq!(best.orders[0].supplier_name, "B");
}
