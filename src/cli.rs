//! 命令行定义
//!
//! 从 JSON 文件读取寻源请求 / 排期物料,输出 JSON 或打印文档

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::domain::schedule::{ScheduleItem, StageTemplate};
use crate::engine::matcher::{SearchError, SearchRequest, SearchResponse, SemanticSearch};
use crate::engine::strategy::StrategyType;

/// 采购规划管线
#[derive(Parser, Debug)]
#[command(
    name = "procurement-planner",
    about = "Procurement planning: sourcing strategies, purchase orders, construction schedule",
    version
)]
pub struct Cli {
    /// 配置文件 (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON 格式日志
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the three sourcing strategies for a request file
    Optimize {
        /// Sourcing request (JSON)
        request: PathBuf,

        /// Print the short comparison instead of the full result
        #[arg(long)]
        compare: bool,
    },

    /// Per-supplier proposals for a request file
    Proposals { request: PathBuf },

    /// Print purchase orders of one strategy as a document
    Orders {
        request: PathBuf,

        /// best_price / one_stop_shop / balanced (default: recommended)
        #[arg(short, long)]
        strategy: Option<StrategyType>,

        /// Also write the orders spreadsheet to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Build a construction schedule from an items file
    Schedule {
        items: PathBuf,

        /// Calendar date of week 0 (CSV output only)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Print CSV instead of JSON
        #[arg(long)]
        csv: bool,
    },

    /// List sourcing strategies
    Strategies,

    /// List default construction stages
    Stages,

    /// Print the effective configuration
    Config,
}

/// 排期输入文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleFile {
    #[serde(default)]
    pub project_name: Option<String>,
    pub items: Vec<ScheduleItem>,
    /// 非空时使用自定义阶段
    #[serde(default)]
    pub stages: Vec<StageTemplate>,
}

/// 离线模式检索 (命令行不接检索服务)
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSearch;

#[async_trait]
impl SemanticSearch for OfflineSearch {
    async fn search(&self, _request: SearchRequest) -> Result<SearchResponse, SearchError> {
        Err(SearchError::Unavailable("offline mode".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_command() {
        let cli = Cli::try_parse_from([
            "procurement-planner",
            "orders",
            "req.json",
            "--strategy",
            "one_stop_shop",
        ])
        .unwrap();
        match cli.command {
            Command::Orders { strategy, csv, .. } => {
                assert_eq!(strategy, Some(StrategyType::OneStopShop));
                assert!(csv.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_schedule_file_defaults() {
        let file: ScheduleFile =
            serde_json::from_str(r#"{"items":[{"name":"Кирпич","quantity":100,"unit":"шт"}]}"#)
                .unwrap();
        assert!(file.stages.is_empty());
        assert!(file.project_name.is_none());
    }
}
