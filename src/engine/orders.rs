// ==========================================
// 采购规划管线 - 订单生成引擎
// ==========================================
// 职责: 按供应商拆分策略分配结果,生成采购订单
// 输入: 物料 → 报价 分配
// 输出: 每个供应商一张订单 (subtotal / delivery / total)
// ==========================================
// 红线: 同一物料只进一张订单; total = subtotal + delivery_cost
// ==========================================

use crate::domain::sourcing::{
    round_money, Assignment, CreateOrdersRequest, CreateOrdersResponse, GeneratedOrder,
    GeneratedOrderItem, OrderLine, SourcingOrder,
};
use crate::domain::types::OrderStatus;
use crate::engine::error::{EngineError, EngineResult};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// DeliveryCosts - 配送费估算
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryCosts {
    pub default_cost: f64,
    pub per_supplier: HashMap<String, f64>,
}

impl DeliveryCosts {
    pub fn flat(default_cost: f64) -> Self {
        Self {
            default_cost,
            per_supplier: HashMap::new(),
        }
    }

    pub fn cost_for(&self, supplier_name: &str) -> f64 {
        self.per_supplier
            .get(supplier_name)
            .copied()
            .unwrap_or(self.default_cost)
    }
}

// ==========================================
// OrderGenerator - 订单生成器
// ==========================================
pub struct OrderGenerator {
    delivery: DeliveryCosts,
}

impl OrderGenerator {
    pub fn new(delivery: DeliveryCosts) -> Self {
        Self { delivery }
    }

    /// 按供应商分组生成订单（按供应商名称排序）
    pub fn generate(&self, assignments: &[Assignment]) -> Vec<SourcingOrder> {
        let mut grouped: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        for assignment in assignments {
            grouped
                .entry(assignment.offer.supplier_name.as_str())
                .or_default()
                .push(assignment);
        }

        grouped
            .into_iter()
            .map(|(supplier, lines)| {
                let items: Vec<OrderLine> = lines.into_iter().map(order_line).collect();
                let subtotal =
                    round_money(items.iter().map(|l| l.price * l.requested_quantity).sum());
                let delivery_cost = round_money(self.delivery.cost_for(supplier));

                SourcingOrder {
                    supplier_name: supplier.to_string(),
                    items,
                    subtotal,
                    delivery_cost,
                    total: round_money(subtotal + delivery_cost),
                }
            })
            .collect()
    }

    // ==========================================
    // 正式订单
    // ==========================================

    /// 将策略订单转为草稿订单（重新计算金额）
    pub fn create_orders(request: CreateOrdersRequest) -> EngineResult<CreateOrdersResponse> {
        if request.orders.is_empty() {
            return Err(EngineError::InvalidInput("订单列表为空".to_string()));
        }

        let created_at = Utc::now();
        let mut orders = Vec::with_capacity(request.orders.len());

        for order in request.orders {
            if order.items.is_empty() {
                warn!(supplier = %order.supplier_name, "跳过空订单");
                continue;
            }

            let items: Vec<GeneratedOrderItem> = order
                .items
                .iter()
                .map(|line| GeneratedOrderItem {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    quantity: line.requested_quantity,
                    unit: line.unit.clone(),
                    unit_price: line.price,
                    total_price: round_money(line.price * line.requested_quantity),
                })
                .collect();
            let subtotal = round_money(items.iter().map(|i| i.unit_price * i.quantity).sum());
            let delivery_cost = round_money(order.delivery_cost);

            orders.push(GeneratedOrder {
                id: Uuid::new_v4().to_string(),
                supplier_name: order.supplier_name,
                items,
                subtotal,
                delivery_cost,
                total: round_money(subtotal + delivery_cost),
                status: OrderStatus::Draft,
                created_at,
                notes: request.notes.clone(),
            });
        }

        let total_budget = round_money(orders.iter().map(|o| o.total).sum());
        info!(
            strategy = %request.strategy_type,
            stage = request.stage_name.as_deref().unwrap_or("-"),
            orders = orders.len(),
            total_budget,
            "生成草稿订单"
        );

        Ok(CreateOrdersResponse {
            total_orders: orders.len(),
            total_budget,
            orders,
        })
    }

    /// 推进订单状态（只能前进一步）
    pub fn advance_status(order: &mut GeneratedOrder, target: OrderStatus) -> EngineResult<()> {
        if order.status.next() != Some(target) {
            return Err(EngineError::InvalidStateTransition {
                stage: order.id.clone(),
                from: order.status.to_string(),
                to: target.to_string(),
            });
        }
        order.status = target;
        Ok(())
    }
}

fn order_line(assignment: &Assignment) -> OrderLine {
    OrderLine {
        product_id: assignment.offer.product_id.clone(),
        product_name: assignment.offer.product_name.clone(),
        requested_name: assignment.requested_name.clone(),
        requested_quantity: assignment.requested_quantity,
        unit: assignment.unit.clone(),
        price: assignment.offer.price,
        line_total: round_money(assignment.line_cost()),
    }
}
