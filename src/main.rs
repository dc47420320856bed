// ==========================================
// 采购规划管线 - 命令行主入口
// ==========================================
// 输入: JSON 文件 (寻源请求 / 排期物料)
// 输出: JSON / 订单文档 / CSV (stdout)
// 检索服务: 离线 (匹配相关命令不在命令行提供)
// ==========================================

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;

use procurement_planner::cli::{Cli, Command, OfflineSearch, ScheduleFile};
use procurement_planner::domain::sourcing::SourcingRequest;
use procurement_planner::{logging, ConfigManager, PlanningApi, StrategyType};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("读取文件失败: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("解析 JSON 失败: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(version = procurement_planner::VERSION, "{}", procurement_planner::APP_NAME);

    let manager = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;
    let api = PlanningApi::from_config_manager(Arc::new(OfflineSearch), None, &manager)?;

    match cli.command {
        Command::Optimize { request, compare } => {
            let request: SourcingRequest = read_json(&request)?;
            let result = api.optimize_stage(request).await?;
            if compare {
                print_json(&api.compare_strategies(&result))?;
            } else {
                print_json(&result)?;
            }
        }
        Command::Proposals { request } => {
            let request: SourcingRequest = read_json(&request)?;
            print_json(&api.supplier_proposals(&request)?)?;
        }
        Command::Orders {
            request,
            strategy,
            csv,
        } => {
            let request: SourcingRequest = read_json(&request)?;
            let stage_name = request.stage_name.clone();
            let result = api.optimize_stage(request).await?;

            // 未指定时取推荐策略,无推荐则均衡
            let strategy_type = strategy
                .or(result.recommended_strategy)
                .unwrap_or(StrategyType::Balanced);
            let orders = api.orders_for_strategy(&result, strategy_type)?;

            if let Some(path) = csv {
                api.export_orders_csv(&orders, &path)?;
                tracing::info!(path = %path.display(), orders = orders.len(), "订单表已导出");
            }
            println!("{}", api.orders_document(&orders, stage_name.as_deref()));
        }
        Command::Schedule {
            items,
            start_date,
            csv,
        } => {
            let file: ScheduleFile = read_json(&items)?;
            let schedule = if file.stages.is_empty() {
                api.build_schedule(file.project_name, file.items)?
            } else {
                api.build_custom_schedule(file.project_name, file.items, file.stages)?
            };

            if csv {
                print!("{}", api.export_schedule_csv(&schedule, start_date)?);
            } else {
                print_json(&schedule)?;
            }
        }
        Command::Strategies => print_json(&api.available_strategies())?,
        Command::Stages => print_json(&api.available_stages())?,
        Command::Config => print_json(api.config())?,
    }

    Ok(())
}
