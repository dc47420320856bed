// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use procurement_planner::domain::schedule::ScheduleItem;
use procurement_planner::domain::sourcing::{ProductOffer, SourcingItem, SourcingRequest};
use procurement_planner::{EstimateItem, Product};

// ==========================================
// Product 构建器
// ==========================================

pub struct ProductBuilder {
    id: String,
    name: String,
    price: f64,
    supplier: String,
    category: String,
    stock: f64,
}

impl ProductBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: 100.0,
            supplier: "Default".to_string(),
            category: String::new(),
            stock: 1000.0,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn supplier(mut self, supplier: &str) -> Self {
        self.supplier = supplier.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn stock(mut self, stock: f64) -> Self {
        self.stock = stock;
        self
    }

    pub fn build(self) -> Product {
        Product {
            sku: format!("SKU-{}", self.id),
            id: self.id,
            name: self.name,
            description: String::new(),
            price: self.price,
            currency: "RUB".to_string(),
            image_url: None,
            category: self.category,
            supplier: self.supplier,
            stock: self.stock,
        }
    }
}

// ==========================================
// 寻源数据
// ==========================================

pub fn offer(supplier: &str, product: &str, price: f64) -> ProductOffer {
    ProductOffer {
        product_id: format!("{}-{}", supplier, product),
        product_name: format!("{} ({})", product, supplier),
        supplier_name: supplier.to_string(),
        price,
        currency: "RUB".to_string(),
        stock: None,
        delivery_days: 2,
    }
}

pub fn sourcing_item(
    id: &str,
    name: &str,
    quantity: f64,
    offers: Vec<ProductOffer>,
) -> SourcingItem {
    SourcingItem {
        item_id: id.to_string(),
        name: name.to_string(),
        quantity,
        unit: "pcs".to_string(),
        offers,
    }
}

/// 水泥 + 钢筋: A 全覆盖但偏贵,B 只有便宜水泥,C 只有便宜钢筋
pub fn cement_rebar_request() -> SourcingRequest {
    SourcingRequest {
        stage_name: Some("Rough work".to_string()),
        items: vec![
            sourcing_item(
                "1",
                "Cement M500",
                150.0,
                vec![offer("A", "cement", 520.0), offer("B", "cement", 450.0)],
            ),
            sourcing_item(
                "2",
                "Rebar 12mm",
                200.0,
                vec![offer("A", "rebar", 60.0), offer("C", "rebar", 50.0)],
            ),
        ],
        delivery_cost_estimate: Some(1500.0),
        ..SourcingRequest::default()
    }
}

// ==========================================
// 估算 / 排期数据
// ==========================================

pub fn estimate_item(id: &str, text: &str, quantity: f64, unit: &str) -> EstimateItem {
    EstimateItem::new(id, text, quantity, unit)
}

pub fn schedule_item(name: &str, quantity: f64, category: Option<&str>) -> ScheduleItem {
    ScheduleItem {
        name: name.to_string(),
        quantity,
        unit: "pcs".to_string(),
        category: category.map(str::to_string),
    }
}
