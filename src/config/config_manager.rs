// ==========================================
// 采购规划管线 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验、快照
// 存储: JSON 文件 (可选) + PROCUREMENT_PLANNER_* 环境变量
// ==========================================

use crate::config::planner_config::PlannerConfig;
use crate::domain::schedule::MAX_SCHEDULE_WEEKS;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 配置键 (环境变量名)
// ==========================================
pub mod config_keys {
    pub const MATCHER_TOP_K: &str = "PROCUREMENT_PLANNER_MATCHER_TOP_K";
    pub const MATCHER_MAX_CONCURRENCY: &str = "PROCUREMENT_PLANNER_MATCHER_MAX_CONCURRENCY";
    pub const MATCHER_ITEM_TIMEOUT_MS: &str = "PROCUREMENT_PLANNER_MATCHER_ITEM_TIMEOUT_MS";
    pub const SOURCING_DELIVERY_COST: &str = "PROCUREMENT_PLANNER_SOURCING_DELIVERY_COST";
    pub const SOURCING_MAX_CANDIDATES: &str = "PROCUREMENT_PLANNER_SOURCING_MAX_CANDIDATES";
    pub const SOURCING_BALANCED_MAX_SUPPLIERS: &str =
        "PROCUREMENT_PLANNER_SOURCING_BALANCED_MAX_SUPPLIERS";
    pub const SOURCING_RECOMMENDATION_TOLERANCE: &str =
        "PROCUREMENT_PLANNER_SOURCING_RECOMMENDATION_TOLERANCE";
    pub const SOURCING_RESPECT_STOCK: &str = "PROCUREMENT_PLANNER_SOURCING_RESPECT_STOCK";
    pub const SCHEDULE_BASE_WEEK: &str = "PROCUREMENT_PLANNER_SCHEDULE_BASE_WEEK";
    pub const SCHEDULE_INCLUDE_EMPTY: &str = "PROCUREMENT_PLANNER_SCHEDULE_INCLUDE_EMPTY";

    pub const ALL: [&str; 10] = [
        MATCHER_TOP_K,
        MATCHER_MAX_CONCURRENCY,
        MATCHER_ITEM_TIMEOUT_MS,
        SOURCING_DELIVERY_COST,
        SOURCING_MAX_CANDIDATES,
        SOURCING_BALANCED_MAX_SUPPLIERS,
        SOURCING_RECOMMENDATION_TOLERANCE,
        SOURCING_RESPECT_STOCK,
        SCHEDULE_BASE_WEEK,
        SCHEDULE_INCLUDE_EMPTY,
    ];
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置值格式错误 (key: {key}, value: {value})")]
    InvalidValue { key: String, value: String },

    #[error("配置值超出范围 (key: {key}): {message}")]
    OutOfRange { key: String, message: String },
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: PlannerConfig,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: PlannerConfig) -> Result<Self, ConfigError> {
        let manager = Self { config };
        manager.validate()?;
        Ok(manager)
    }

    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        info!(path = %path.as_ref().display(), "加载配置文件");
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(raw)?;
        Self::from_config(config)
    }

    /// 加载配置：文件（可选）+ 环境变量覆写
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut manager = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::new(),
        };
        manager.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(manager)
    }

    /// 应用覆写
    ///
    /// # 参数
    /// - lookup: 按配置键取值（生产环境为环境变量）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        use config_keys::*;

        for key in ALL {
            let Some(value) = lookup(key) else {
                continue;
            };
            debug!(key, value = %value, "应用配置覆写");

            match key {
                MATCHER_TOP_K => self.config.matcher.top_k = parse_value(key, &value)?,
                MATCHER_MAX_CONCURRENCY => {
                    self.config.matcher.max_concurrency = parse_value(key, &value)?
                }
                MATCHER_ITEM_TIMEOUT_MS => {
                    self.config.matcher.item_timeout_ms = parse_value(key, &value)?
                }
                SOURCING_DELIVERY_COST => {
                    self.config.sourcing.delivery_cost_estimate = parse_value(key, &value)?
                }
                SOURCING_MAX_CANDIDATES => {
                    self.config.sourcing.max_candidates_per_item = parse_value(key, &value)?
                }
                SOURCING_BALANCED_MAX_SUPPLIERS => {
                    self.config.sourcing.balanced_max_suppliers = parse_value(key, &value)?
                }
                SOURCING_RECOMMENDATION_TOLERANCE => {
                    self.config.sourcing.recommendation_tolerance = parse_value(key, &value)?
                }
                SOURCING_RESPECT_STOCK => self.config.sourcing.respect_stock = is_true(&value),
                SCHEDULE_BASE_WEEK => self.config.schedule.base_week = parse_value(key, &value)?,
                SCHEDULE_INCLUDE_EMPTY => {
                    self.config.schedule.include_empty_stages = is_true(&value)
                }
                _ => {}
            }
        }

        self.validate()
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range = |key: &str, message: &str| ConfigError::OutOfRange {
            key: key.to_string(),
            message: message.to_string(),
        };

        let m = &self.config.matcher;
        if m.top_k == 0 {
            return Err(out_of_range("matcher.top_k", "必须 ≥ 1"));
        }
        if m.max_concurrency == 0 {
            return Err(out_of_range("matcher.max_concurrency", "必须 ≥ 1"));
        }
        if m.item_timeout_ms == 0 {
            return Err(out_of_range("matcher.item_timeout_ms", "必须 > 0"));
        }
        if !(0.0..=1.0).contains(&m.missing_score_default) {
            return Err(out_of_range("matcher.missing_score_default", "必须在 [0, 1]"));
        }

        let s = &self.config.sourcing;
        if !s.delivery_cost_estimate.is_finite() || s.delivery_cost_estimate < 0.0 {
            return Err(out_of_range("sourcing.delivery_cost_estimate", "必须为非负数"));
        }
        if s.max_candidates_per_item == 0 {
            return Err(out_of_range("sourcing.max_candidates_per_item", "必须 ≥ 1"));
        }
        if s.balanced_max_suppliers == 0 {
            return Err(out_of_range("sourcing.balanced_max_suppliers", "必须 ≥ 1"));
        }
        if !(0.0..=1.0).contains(&s.recommendation_tolerance) {
            return Err(out_of_range("sourcing.recommendation_tolerance", "必须在 [0, 1]"));
        }

        if self.config.schedule.base_week > MAX_SCHEDULE_WEEKS {
            return Err(ConfigError::OutOfRange {
                key: "schedule.base_week".to_string(),
                message: format!("必须 ≤ {}", MAX_SCHEDULE_WEEKS),
            });
        }

        Ok(())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 配置快照（JSON），随优化结果记录以便复现
    pub fn snapshot(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_json_uses_defaults() {
        let manager =
            ConfigManager::from_json_str(r#"{"sourcing":{"balanced_max_suppliers":2}}"#).unwrap();
        let cfg = manager.config();
        assert_eq!(cfg.sourcing.balanced_max_suppliers, 2);
        assert_eq!(cfg.sourcing.recommendation_tolerance, 0.9);
        assert_eq!(cfg.matcher.top_k, 5);
    }

    #[test]
    fn test_overrides_applied_and_validated() {
        let env: HashMap<&str, &str> = [
            (config_keys::SOURCING_RECOMMENDATION_TOLERANCE, "0.75"),
            (config_keys::SCHEDULE_INCLUDE_EMPTY, "yes"),
        ]
        .into_iter()
        .collect();

        let mut manager = ConfigManager::new();
        manager
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(manager.config().sourcing.recommendation_tolerance, 0.75);
        assert!(manager.config().schedule.include_empty_stages);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut manager = ConfigManager::new();
        let err = manager
            .apply_overrides(|k| (k == config_keys::MATCHER_TOP_K).then(|| "abc".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = manager
            .apply_overrides(|k| {
                (k == config_keys::SOURCING_RECOMMENDATION_TOLERANCE).then(|| "1.5".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn test_base_week_over_limit_rejected() {
        let mut manager = ConfigManager::new();
        let err = manager
            .apply_overrides(|k| {
                (k == config_keys::SCHEDULE_BASE_WEEK).then(|| "4000000000".to_string())
            })
            .unwrap_err();
        match err {
            ConfigError::OutOfRange { key, .. } => assert_eq!(key, "schedule.base_week"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_parses_back() {
        let manager = ConfigManager::from_json_str(
            r#"{"matcher":{"top_k":3},"schedule":{"base_week":4,"include_empty_stages":true}}"#,
        )
        .unwrap();
        let snapshot = manager.snapshot().unwrap();

        let restored: PlannerConfig = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(&restored, manager.config());
        assert_eq!(restored.matcher.top_k, 3);
    }
}
