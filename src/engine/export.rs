// ==========================================
// 采购规划管线 - 导出
// ==========================================
// 职责: 订单 → CSV 表格 / 打印文本;排期 → CSV
// 工具: csv::Writer
// ==========================================

use crate::domain::schedule::{Schedule, ScheduleItem};
use crate::domain::sourcing::{round_money, SourcingOrder};
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Duration, NaiveDate};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

// 订单表头 (面向俄语用户)
const ORDERS_HEADER: &[&str] = &[
    "Поставщик",
    "Товар",
    "Запрошено",
    "Количество",
    "Ед.",
    "Цена",
    "Сумма",
];

const SCHEDULE_HEADER: &[&str] = &[
    "stage",
    "start_week",
    "duration_weeks",
    "end_week",
    "status",
    "start_date",
    "end_date",
    "item",
    "quantity",
    "unit",
    "category",
];

const UNCATEGORIZED_STAGE: &str = "uncategorized";

fn fmt_num(value: f64) -> String {
    format!("{:.2}", round_money(value))
}

// ==========================================
// 订单导出
// ==========================================

/// 订单写入 CSV
///
/// 每行一条订单行;每张订单后附 小计 / 配送 / 合计 三行;末尾为总计
pub fn write_orders_csv<W: Write>(orders: &[SourcingOrder], writer: W) -> EngineResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(ORDERS_HEADER)?;

    let mut grand_total = 0.0;
    for order in orders {
        for line in &order.items {
            wtr.write_record(vec![
                order.supplier_name.clone(),
                line.product_name.clone(),
                line.requested_name.clone(),
                line.requested_quantity.to_string(),
                line.unit.clone(),
                fmt_num(line.price),
                fmt_num(line.line_total),
            ])?;
        }
        for (label, value) in [
            ("Итого товары", order.subtotal),
            ("Доставка", order.delivery_cost),
            ("ВСЕГО", order.total),
        ] {
            wtr.write_record([
                order.supplier_name.as_str(),
                label,
                "",
                "",
                "",
                "",
                fmt_num(value).as_str(),
            ])?;
        }
        grand_total += order.total;
    }

    wtr.write_record(["ИТОГО ПО ЗАКАЗАМ", "", "", "", "", "", fmt_num(grand_total).as_str()])?;
    wtr.flush()?;
    Ok(())
}

pub fn orders_csv_string(orders: &[SourcingOrder]) -> EngineResult<String> {
    let mut buf = Vec::new();
    write_orders_csv(orders, &mut buf)?;
    String::from_utf8(buf).map_err(|e| EngineError::Export(e.to_string()))
}

pub fn export_orders_csv(orders: &[SourcingOrder], path: &Path) -> EngineResult<()> {
    let file = File::create(path)?;
    write_orders_csv(orders, file)?;
    info!(path = %path.display(), orders = orders.len(), "订单已导出 CSV");
    Ok(())
}

/// 单张订单的打印文本
pub fn format_order_text(order: &SourcingOrder, stage_name: Option<&str>) -> String {
    let mut lines = vec![
        format!("Заказ для: {}", order.supplier_name),
        format!("Этап: {}", stage_name.unwrap_or("Не указан")),
        String::new(),
        "Позиции:".to_string(),
    ];
    for (i, line) in order.items.iter().enumerate() {
        lines.push(format!(
            "{}. {} - {} {} x {} ₽ = {} ₽",
            i + 1,
            line.product_name,
            line.requested_quantity,
            line.unit,
            fmt_num(line.price),
            fmt_num(line.line_total)
        ));
    }
    lines.push(String::new());
    lines.push(format!("Итого товары: {} ₽", fmt_num(order.subtotal)));
    lines.push(format!("Доставка: {} ₽", fmt_num(order.delivery_cost)));
    lines.push(format!("ВСЕГО: {} ₽", fmt_num(order.total)));
    lines.join("\n")
}

/// 全部订单的打印文档
pub fn orders_to_text(orders: &[SourcingOrder], stage_name: Option<&str>) -> String {
    let separator = "-".repeat(40);
    let mut blocks: Vec<String> = orders
        .iter()
        .map(|o| format_order_text(o, stage_name))
        .collect();

    let grand_total: f64 = orders.iter().map(|o| o.total).sum();
    blocks.push(format!(
        "Заказов: {}\nИТОГО ПО ЗАКАЗАМ: {} ₽",
        orders.len(),
        fmt_num(grand_total)
    ));
    blocks.join(&format!("\n{}\n", separator))
}

// ==========================================
// 排期导出
// ==========================================

/// 排期写入 CSV (每个阶段物料一行;无物料阶段输出一行空物料)
///
/// 提供 start_date 时按周换算起止日期
pub fn write_schedule_csv<W: Write>(
    schedule: &Schedule,
    start_date: Option<NaiveDate>,
    writer: W,
) -> EngineResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(SCHEDULE_HEADER)?;

    let date_of = |week: u32| {
        start_date
            .map(|d| (d + Duration::weeks(i64::from(week))).to_string())
            .unwrap_or_default()
    };

    for stage in &schedule.stages {
        let head = [
            stage.stage_name.clone(),
            stage.relative_start_week.to_string(),
            stage.duration_weeks.to_string(),
            stage.end_week().to_string(),
            stage.status.to_string(),
            date_of(stage.relative_start_week),
            date_of(stage.end_week()),
        ];

        if stage.items.is_empty() {
            wtr.write_record(head.iter().map(String::as_str).chain(["", "", "", ""]))?;
            continue;
        }
        for item in &stage.items {
            wtr.write_record(head.iter().cloned().chain(item_cells(item)))?;
        }
    }

    for item in &schedule.uncategorized {
        wtr.write_record(
            [UNCATEGORIZED_STAGE, "", "", "", "", "", ""]
                .into_iter()
                .map(str::to_string)
                .chain(item_cells(item)),
        )?;
    }

    wtr.flush()?;
    Ok(())
}

fn item_cells(item: &ScheduleItem) -> [String; 4] {
    [
        item.name.clone(),
        item.quantity.to_string(),
        item.unit.clone(),
        item.category.clone().unwrap_or_default(),
    ]
}

pub fn schedule_to_csv(schedule: &Schedule, start_date: Option<NaiveDate>) -> EngineResult<String> {
    let mut buf = Vec::new();
    write_schedule_csv(schedule, start_date, &mut buf)?;
    String::from_utf8(buf).map_err(|e| EngineError::Export(e.to_string()))
}
