// ==========================================
// 仓储物流调度系统 - 产品实体
// ==========================================

use serde::{Deserialize, Serialize};

/// 产品主数据
///
/// 调度核心只读取 weight_kg 用于订单重量计算，从不修改产品。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// 单件重量（kg）
    pub weight_kg: f64,
}
