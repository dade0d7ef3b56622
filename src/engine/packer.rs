// ==========================================
// 仓储物流调度系统 - 载重装箱引擎
// ==========================================
// 算法: first-fit —— 按给定顺序扫描车辆，装入第一辆
// 剩余载重足够的车
// 红线: 确定性。相同的订单序 + 车辆序必须得到相同分配，
// 不做随机化、不做优化重排、不做再平衡
// ==========================================

use crate::domain::order::FulfillableOrder;
use crate::domain::partner::DeliveryPartner;
use crate::domain::route::VehicleLoad;
use tracing::debug;

/// 装箱结果
#[derive(Debug, Clone)]
pub struct PackResult {
    /// 每车装载（与输入车辆顺序一致，含空载车）
    pub loads: Vec<VehicleLoad>,
    /// 任何车都装不下的订单（静默放弃本轮，保持 Pending）
    pub unassigned: Vec<FulfillableOrder>,
}

// ==========================================
// CapacityPacker - 载重装箱引擎
// ==========================================
pub struct CapacityPacker {
    // 无状态引擎，不需要注入依赖
}

impl Default for CapacityPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl CapacityPacker {
    pub fn new() -> Self {
        Self {}
    }

    /// first-fit 装箱
    ///
    /// 装箱质量是次要的：外部求解器自己会做路线优化，
    /// 这里只是昂贵求解调用前的载重可行性闸门。
    ///
    /// # 参数
    /// - orders: 可履约订单（保持过滤输出顺序）
    /// - partners: 车辆列表（扫描顺序即输入顺序，初始空载）
    ///
    /// # 返回
    /// 每车装载列表 + 未能装载的订单
    pub fn pack(
        &self,
        orders: Vec<FulfillableOrder>,
        partners: Vec<DeliveryPartner>,
    ) -> PackResult {
        let mut loads: Vec<VehicleLoad> = partners.into_iter().map(VehicleLoad::new).collect();
        let mut unassigned = Vec::new();

        for order in orders {
            let slot = loads
                .iter_mut()
                .find(|load| load.remaining_capacity_kg() >= order.weight_kg);
            match slot {
                Some(load) => load.assign(order),
                None => {
                    debug!(
                        order_id = %order.order.id,
                        weight_kg = order.weight_kg,
                        "订单无车可装，放弃本轮"
                    );
                    unassigned.push(order);
                }
            }
        }

        PackResult { loads, unassigned }
    }
}
