// ==========================================
// 仓储物流调度系统 - 配送路线实体
// ==========================================
// 路线 / 路线停靠点（持久化） + 车辆装载（运行期）
// ==========================================

use crate::domain::order::FulfillableOrder;
use crate::domain::partner::DeliveryPartner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 配送路线
///
/// 每个成功求解的车辆装载产生一条；创建后本核心不再更新。
/// route_geometry / traffic_segments 对本核心是不透明 JSON，
/// 原样透传给地图展示层。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRoute {
    pub id: String,
    pub delivery_partner_id: String,
    pub warehouse_id: String,
    pub route_geometry: serde_json::Value,
    pub total_duration_seconds: f64,
    pub total_distance_meters: f64,
    /// 模拟交通拥堵段（可选叠加层）
    pub traffic_segments: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// 路线停靠点
///
/// stop_number 从 1 开始，按求解器返回的访问顺序编号。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: String,
    pub route_id: String,
    pub order_id: String,
    pub stop_number: i64,
}

// ==========================================
// VehicleLoad - 车辆装载（运行期，不落库）
// ==========================================

/// 一次规划中分配给单个配送伙伴的订单集合
#[derive(Debug, Clone)]
pub struct VehicleLoad {
    pub partner: DeliveryPartner,
    /// 分配顺序即装载顺序
    pub orders: Vec<FulfillableOrder>,
    pub total_weight_kg: f64,
}

impl VehicleLoad {
    /// 创建空载车辆
    pub fn new(partner: DeliveryPartner) -> Self {
        Self {
            partner,
            orders: Vec::new(),
            total_weight_kg: 0.0,
        }
    }

    /// 剩余可用载重（kg）
    pub fn remaining_capacity_kg(&self) -> f64 {
        self.partner.max_capacity_kg - self.total_weight_kg
    }

    /// 装载一个订单（调用方负责容量校验）
    pub fn assign(&mut self, order: FulfillableOrder) {
        self.total_weight_kg += order.weight_kg;
        self.orders.push(order);
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
