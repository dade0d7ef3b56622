// ==========================================
// 仓储物流调度系统 - 入库单实体
// ==========================================

use crate::domain::types::ShipmentStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 入库单
///
/// 收货动作（mark Received + 库存加量）必须是存储侧的原子操作，
/// 与出库扣减 decrement 互为对称。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundShipment {
    pub id: String,
    pub product_id: String,
    pub warehouse_id: String,
    pub quantity: i64,
    /// 预计到货日
    pub eta: Option<NaiveDate>,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}
