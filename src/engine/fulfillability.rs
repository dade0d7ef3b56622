// ==========================================
// 仓储物流调度系统 - 履约过滤引擎
// ==========================================
// 职责: 判定待派订单是否可履约，并计算订单总重
// 输入: 待派订单 + 库存快照 + 产品单重快照
// 输出: 可履约订单序列（保持输入顺序，不做优先级重排）
// ==========================================

use crate::domain::order::{CustomerOrder, FulfillableOrder};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// FulfillabilityFilter - 履约过滤引擎
// ==========================================
pub struct FulfillabilityFilter {
    // 无状态引擎，不需要注入依赖
}

impl Default for FulfillabilityFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FulfillabilityFilter {
    pub fn new() -> Self {
        Self {}
    }

    /// 过滤可履约订单
    ///
    /// 判定规则（两项都满足才通过）：
    /// 1) 配送坐标存在且合法
    /// 2) 每个明细行 stock[product] >= quantity
    ///
    /// 订单重量 = Σ(数量 × 产品单重)，缺失单重按 0 计。
    /// 零明细订单视为库存满足（重量 0），但仍要求坐标。
    /// 不通过的订单静默排除（保持 Pending，留待下轮），不是错误。
    ///
    /// # 参数
    /// - orders: 待派订单（先到先服务顺序）
    /// - stock: 库存快照 product_id -> quantity
    /// - weights: 产品单重快照 product_id -> weight_kg
    ///
    /// # 返回
    /// 可履约订单序列，顺序与输入一致
    pub fn filter(
        &self,
        orders: Vec<CustomerOrder>,
        stock: &HashMap<String, i64>,
        weights: &HashMap<String, f64>,
    ) -> Vec<FulfillableOrder> {
        let mut fulfillable = Vec::with_capacity(orders.len());

        for order in orders {
            let location = match order.delivery_location {
                Some(loc) => loc,
                None => {
                    debug!(order_id = %order.id, "排除订单: 配送坐标缺失或不合法");
                    continue;
                }
            };

            let stock_available = order
                .items
                .iter()
                .all(|item| stock.get(&item.product_id).copied().unwrap_or(0) >= item.quantity);
            if !stock_available {
                debug!(order_id = %order.id, "排除订单: 库存不足");
                continue;
            }

            let weight_kg = order
                .items
                .iter()
                .map(|item| {
                    weights.get(&item.product_id).copied().unwrap_or(0.0) * item.quantity as f64
                })
                .sum();

            fulfillable.push(FulfillableOrder {
                order,
                location,
                weight_kg,
            });
        }

        fulfillable
    }
}
