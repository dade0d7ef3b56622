// ==========================================
// 仓储物流调度系统 - 仓库与库存实体
// ==========================================

use crate::domain::types::GeoPoint;
use serde::{Deserialize, Serialize};

/// 仓库主数据
///
/// 作为每条配送路线的起点与终点；规划运行期间视为不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    /// 仓库坐标；为 None 表示坐标缺失或不合法，无法作为发车原点
    pub location: Option<GeoPoint>,
}

/// 库存行: (warehouse, product) -> 在库数量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    pub warehouse_id: String,
    pub product_id: String,
    pub quantity: i64,
}
