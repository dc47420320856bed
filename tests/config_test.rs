// ==========================================
// 配置集成测试
// ==========================================
// 测试范围: 配置文件加载 → 校验 → 作用于 PlanningApi
// ==========================================

mod helpers;

use helpers::mock_services::MockSearch;
use helpers::test_data_builder::*;
use procurement_planner::config::ConfigError;
use procurement_planner::engine::schedule::{STAGE_LANDSCAPING, STAGE_PREPARATION};
use procurement_planner::{ApiError, ConfigManager, PlanningApi, StrategyKind, StrategyType};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn config_file(raw: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(raw.as_bytes()).unwrap();
    file
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = config_file(r#"{ "schedule": { "base_week": 2, "include_empty_stages": true } }"#);
    let manager = ConfigManager::from_file(file.path()).unwrap();

    assert_eq!(manager.config().matcher.top_k, 5);
    assert_eq!(manager.config().sourcing.delivery_cost_estimate, 1500.0);
    assert_eq!(manager.config().schedule.base_week, 2);
}

#[test]
fn test_schedule_settings_flow_into_api() {
    let file = config_file(r#"{ "schedule": { "base_week": 2, "include_empty_stages": true } }"#);
    let manager = ConfigManager::from_file(file.path()).unwrap();
    let api =
        PlanningApi::from_config_manager(Arc::new(MockSearch::new()), None, &manager).unwrap();

    let schedule = api
        .build_schedule(None, vec![schedule_item("Кирпич", 100.0, None)])
        .unwrap();

    assert_eq!(schedule.stages_count, 7);
    assert_eq!(schedule.stages[0].stage_name, STAGE_PREPARATION);
    assert_eq!(schedule.stages[0].relative_start_week, 2);
    let landscaping = schedule.stage(STAGE_LANDSCAPING).unwrap();
    assert_eq!(landscaping.relative_start_week, 17);
    assert_eq!(schedule.total_duration_weeks, 17);
}

#[tokio::test]
async fn test_sourcing_settings_flow_into_api() {
    let file = config_file(r#"{ "sourcing": { "balanced_max_suppliers": 1 } }"#);
    let manager = ConfigManager::from_file(file.path()).unwrap();
    let api =
        PlanningApi::from_config_manager(Arc::new(MockSearch::new()), None, &manager).unwrap();

    let result = api.optimize_stage(cement_rebar_request()).await.unwrap();
    let balanced = result.strategy(StrategyType::Balanced).unwrap();
    assert_eq!(balanced.suppliers_count, 1);
    assert_eq!(
        balanced.kind,
        StrategyKind::Balanced {
            supplier_pool: vec!["A".to_string()]
        }
    );
}

#[test]
fn test_out_of_range_file_rejected() {
    let file = config_file(r#"{ "sourcing": { "recommendation_tolerance": 2.0 } }"#);
    let err = ConfigManager::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { .. }));

    let err: ApiError = err.into();
    assert!(err.to_string().contains("配置错误"));
}

#[test]
fn test_malformed_file_rejected() {
    let file = config_file("{ not json");
    let err = ConfigManager::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
