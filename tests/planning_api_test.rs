// ==========================================
// PlanningApi 集成测试
// ==========================================
// 测试范围: 输入校验、错误映射、外部服务降级、排期操作
// ==========================================

mod helpers;

use helpers::mock_services::{MockSearch, MockSummarizer};
use helpers::test_data_builder::*;
use procurement_planner::domain::schedule::StageTemplate;
use procurement_planner::domain::sourcing::SourcingRequest;
use procurement_planner::engine::summary::StrategySummarizer;
use procurement_planner::{
    ApiError, MatchStatus, PlanningApi, PlannerConfig, StageStatus, StrategyType,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn api_with(search: MockSearch) -> PlanningApi {
    PlanningApi::new(Arc::new(search), None, PlannerConfig::default())
}

fn product(id: &str, supplier: &str, price: f64) -> procurement_planner::Product {
    ProductBuilder::new(id).supplier(supplier).price(price).build()
}

// ==========================================
// 匹配
// ==========================================

#[tokio::test]
async fn test_match_items_rejects_empty_list() {
    let api = api_with(MockSearch::new());
    let err = api
        .match_items(Vec::new(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_zero_concurrency_config_still_completes() {
    let search = MockSearch::new()
        .hits("кирпич", vec![product("brick", "A", 12.0)], Some(0.95))
        .hits("цемент", vec![product("cement", "B", 450.0)], Some(0.9));
    let mut config = PlannerConfig::default();
    config.matcher.max_concurrency = 0;
    let api = PlanningApi::new(Arc::new(search), None, config);

    let batch = tokio::time::timeout(
        std::time::Duration::from_secs(2),
        api.match_items(
            vec![
                estimate_item("1", "кирпич", 1000.0, "шт"),
                estimate_item("2", "цемент", 50.0, "мешок"),
            ],
            &CancellationToken::new(),
        ),
    )
    .await
    .expect("batch must finish")
    .unwrap();

    assert_eq!(batch.matched_count, 2);
    assert!(batch.failed_item_ids.is_empty());
}

#[tokio::test]
async fn test_search_outage_degrades_single_item() {
    let search = MockSearch::new()
        .hits("кирпич", vec![product("brick", "A", 12.0)], Some(0.95))
        .failing("краска");
    let api = api_with(search);

    let mut painted = estimate_item("2", "краска", 10.0, "л");
    painted.match_score = 0.7;
    painted.status = MatchStatus::Review;

    let batch = api
        .match_items(
            vec![estimate_item("1", "кирпич", 1000.0, "шт"), painted],
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(batch.failed_item_ids, vec!["2".to_string()]);
    assert_eq!(batch.items[0].status, MatchStatus::Matched);
    assert_eq!(batch.items[1].status, MatchStatus::Manual);
    assert_eq!(batch.items[1].match_score, 0.0);
    assert!(!batch.cancelled);
}

#[tokio::test]
async fn test_match_selected_only_searches_selected_items() {
    let search = Arc::new(
        MockSearch::new()
            .hits("песок", vec![product("sand", "A", 900.0)], Some(0.85))
            .hits("щебень", vec![product("gravel", "B", 1200.0)], Some(0.85)),
    );
    let api = PlanningApi::new(search.clone(), None, PlannerConfig::default());

    let items = vec![
        estimate_item("1", "песок", 3.0, "м3"),
        estimate_item("2", "щебень", 5.0, "м3"),
    ];
    let batch = api
        .match_selected(items, &["2".to_string()], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(search.calls(), 1);
    assert_eq!(search.queries(), vec!["щебень".to_string()]);
    assert!(batch.items[0].matched_product.is_none());
    assert_eq!(batch.items[1].status, MatchStatus::Matched);
}

#[tokio::test]
async fn test_match_selected_validates_ids() {
    let api = api_with(MockSearch::new());
    let items = vec![estimate_item("1", "песок", 3.0, "м3")];
    let cancel = CancellationToken::new();

    let err = api
        .match_selected(items.clone(), &[], &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api
        .match_selected(items, &["missing".to_string()], &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_cancelled_batch_leaves_items_untouched() {
    let search =
        MockSearch::new().slow_hits("кирпич", vec![product("brick", "A", 12.0)], 0.95, 200);
    let api = api_with(search);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let batch = api
        .match_items(vec![estimate_item("1", "кирпич", 10.0, "шт")], &cancel)
        .await
        .unwrap();

    assert!(batch.cancelled);
    assert!(batch.items[0].matched_product.is_none());
    assert!(batch.failed_item_ids.is_empty());
}

#[tokio::test]
async fn test_short_query_skips_search() {
    let search = Arc::new(MockSearch::new());
    let api = PlanningApi::new(search.clone(), None, PlannerConfig::default());

    let found = api.search_products(" a ", 10).await.unwrap();
    assert!(found.is_empty());
    assert_eq!(search.calls(), 0);
}

// ==========================================
// 寻源
// ==========================================

#[tokio::test]
async fn test_summary_failure_keeps_result() {
    let summarizer = Arc::new(MockSummarizer::failing());
    let api = PlanningApi::new(
        Arc::new(MockSearch::new()),
        Some(summarizer.clone() as Arc<dyn StrategySummarizer>),
        PlannerConfig::default(),
    );

    let result = api.optimize_stage(cement_rebar_request()).await.unwrap();
    assert_eq!(summarizer.calls(), 1);
    assert!(result.ai_summary.is_empty());
    assert!(result.recommended_strategy.is_some());
    assert_eq!(result.strategies.len(), 3);
}

#[tokio::test]
async fn test_summary_skipped_without_candidates() {
    let summarizer = Arc::new(MockSummarizer::ok("unused"));
    let api = PlanningApi::new(
        Arc::new(MockSearch::new()),
        Some(summarizer.clone() as Arc<dyn StrategySummarizer>),
        PlannerConfig::default(),
    );

    let request = SourcingRequest {
        items: vec![sourcing_item("1", "Кирпич", 100.0, Vec::new())],
        ..SourcingRequest::default()
    };
    let result = api.optimize_stage(request).await.unwrap();

    assert!(result.no_candidates);
    assert!(result.recommended_strategy.is_none());
    assert_eq!(summarizer.calls(), 0);

    let err = api
        .orders_for_strategy(&result, StrategyType::BestPrice)
        .unwrap_err();
    assert!(matches!(err, ApiError::OptimizationFailed(_)));
}

#[tokio::test]
async fn test_optimize_rejects_invalid_request() {
    let api = api_with(MockSearch::new());

    let err = api
        .optimize_stage(SourcingRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::OptimizationFailed(_)));

    let mut request = cement_rebar_request();
    request.delivery_cost_estimate = Some(-1.0);
    let err = api.optimize_stage(request).await.unwrap_err();
    assert!(matches!(err, ApiError::OptimizationFailed(_)));
}

#[test]
fn test_supplier_proposals_ranked_by_coverage() {
    let api = api_with(MockSearch::new());
    let proposals = api.supplier_proposals(&cement_rebar_request()).unwrap();

    let names: Vec<&str> = proposals.iter().map(|p| p.supplier_name.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "B"]);
    assert_eq!(proposals[0].coverage_percent, 100.0);
    assert_eq!(proposals[1].missing_items, vec!["Cement M500".to_string()]);
}

// ==========================================
// 排期
// ==========================================

#[test]
fn test_custom_schedule_validation() {
    let api = api_with(MockSearch::new());

    let err = api
        .build_custom_schedule(None, Vec::new(), Vec::new())
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let cyclic = vec![
        StageTemplate::new("A", 1).after(&["B"]),
        StageTemplate::new("B", 1).after(&["A"]),
    ];
    let err = api
        .build_custom_schedule(None, Vec::new(), cyclic)
        .unwrap_err();
    match err {
        ApiError::InvalidDependencyGraph { stages, .. } => {
            assert!(stages.contains(&"A".to_string()));
            assert!(stages.contains(&"B".to_string()));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_oversized_stage_duration_rejected() {
    let api = api_with(MockSearch::new());
    let templates = vec![
        StageTemplate::new("A", u32::MAX),
        StageTemplate::new("B", 1).after(&["A"]),
    ];
    let err = api
        .build_custom_schedule(None, Vec::new(), templates)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_blank_names_rejected() {
    let api = api_with(MockSearch::new());
    let err = api
        .build_schedule_from_names(None, &["  ".to_string(), String::new()])
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_stage_status_guarded_by_predecessors() {
    let api = api_with(MockSearch::new());
    let templates = vec![
        StageTemplate::new("Walls", 2).with_categories(&["walls"]),
        StageTemplate::new("Paint", 1)
            .with_categories(&["paint"])
            .after(&["Walls"]),
    ];
    let mut schedule = api
        .build_custom_schedule(
            Some("Гараж".to_string()),
            vec![
                schedule_item("Кирпич", 500.0, Some("walls")),
                schedule_item("Краска", 20.0, Some("paint")),
            ],
            templates,
        )
        .unwrap();

    let err = api
        .change_stage_status(&mut schedule, "Paint", StageStatus::InProgress, false)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    api.change_stage_status(&mut schedule, "Walls", StageStatus::InProgress, false)
        .unwrap();
    api.change_stage_status(&mut schedule, "Walls", StageStatus::Completed, false)
        .unwrap();
    let change = api
        .change_stage_status(&mut schedule, "Paint", StageStatus::InProgress, false)
        .unwrap();
    assert!(!change.overridden);

    let progress = api
        .update_stage_progress(&mut schedule, "Paint", 1, Some("первый слой".to_string()))
        .unwrap();
    assert_eq!(progress.percent_complete, 100.0);

    let err = api
        .update_stage_progress(&mut schedule, "Roof", 1, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_add_dependency_rejects_unknown_stage() {
    let api = api_with(MockSearch::new());
    let mut schedule = api
        .build_schedule_from_names(None, &["Кирпич".to_string(), "Краска".to_string()])
        .unwrap();
    let before = schedule.clone();

    let err = api
        .add_stage_dependency(&mut schedule, "Rough work", "Nowhere")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidDependencyGraph { .. }));
    assert_eq!(schedule, before);
}
