// ==========================================
// 仓储物流调度系统 - 订单实体
// ==========================================
// 客户订单 + 订单明细行 + 可履约订单（运行期）
// ==========================================

use crate::domain::types::{GeoPoint, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 订单明细行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
}

/// 客户订单
///
/// delivery_address 仅用于展示；调度只使用 delivery_location 坐标。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub id: String,
    pub customer_name: String,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// 解析后的配送坐标；为 None 表示坐标缺失或不合法
    pub delivery_location: Option<GeoPoint>,
    pub items: Vec<OrderItem>,
}

/// 可履约订单（运行期，不落库）
///
/// 通过履约过滤的订单快照：坐标已确认存在，重量已按产品单重汇总。
#[derive(Debug, Clone)]
pub struct FulfillableOrder {
    pub order: CustomerOrder,
    pub location: GeoPoint,
    /// Σ(明细数量 × 产品单重)，缺失单重按 0 计
    pub weight_kg: f64,
}
