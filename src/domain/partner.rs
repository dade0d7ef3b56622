// ==========================================
// 仓储物流调度系统 - 配送伙伴实体
// ==========================================

use serde::{Deserialize, Serialize};

/// 配送伙伴（一个伙伴 = 一次规划中的一辆可派车辆）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPartner {
    pub id: String,
    pub name: String,
    /// 车型标签（缺省时求解请求使用默认车型）
    pub vehicle_type: Option<String>,
    /// 最大载重（kg）
    pub max_capacity_kg: f64,
}
