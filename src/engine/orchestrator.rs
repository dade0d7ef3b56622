// ==========================================
// 仓储物流调度系统 - 调度管线编排器
// ==========================================
// 控制流: 履约过滤 -> first-fit 装箱 -> (逐车)
// 构建求解请求 -> 求解 -> 回写
// 车辆装载串行处理，一次求解紧跟其回写；
// 单车求解失败只跳过该车，不中止整轮运行
// ==========================================

use crate::domain::order::CustomerOrder;
use crate::domain::partner::DeliveryPartner;
use crate::domain::warehouse::Warehouse;
use crate::engine::fulfillability::FulfillabilityFilter;
use crate::engine::packer::CapacityPacker;
use crate::engine::reconciler::PlanReconciler;
use crate::engine::request_builder::RouteRequestBuilder;
use crate::solver::RouteSolver;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单轮调度运行结果（由上层 API 折算为对外结果）
#[derive(Debug, Default)]
pub struct DispatchRunResult {
    /// 通过履约过滤的订单数
    pub fulfillable_orders: usize,
    /// 无车可装、放弃本轮的订单 ID
    pub unassigned_order_ids: Vec<String>,
    /// 实际发起求解的车辆装载数
    pub loads_attempted: usize,
    /// 路线已持久化的装载数
    pub routes_created: usize,
    /// 求解失败或路线写入失败的装载: (partner_id, reason)
    pub failed_loads: Vec<(String, String)>,
}

// ==========================================
// DispatchOrchestrator - 调度管线编排器
// ==========================================

pub struct DispatchOrchestrator {
    filter: FulfillabilityFilter,
    packer: CapacityPacker,
    builder: RouteRequestBuilder,
    solver: Arc<dyn RouteSolver>,
    reconciler: PlanReconciler,
}

impl DispatchOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - solver: 求解器实现（生产为 GraphHopperSolver，测试为替身）
    /// - reconciler: 回写引擎
    pub fn new(solver: Arc<dyn RouteSolver>, reconciler: PlanReconciler) -> Self {
        Self {
            filter: FulfillabilityFilter::new(),
            packer: CapacityPacker::new(),
            builder: RouteRequestBuilder::new(),
            solver,
            reconciler,
        }
    }

    /// 执行单仓库的一轮派车规划
    ///
    /// 快照（订单/库存/单重/车辆）由调用方在运行开始时读取一次，
    /// 运行中不重读（时点视图，与存储的漂移是接受的设计限制）。
    ///
    /// # 参数
    /// - warehouse: 发车仓库（坐标必须存在）
    /// - pending_orders: 待派订单快照
    /// - stock: 库存快照 product_id -> quantity
    /// - weights: 产品单重快照 product_id -> weight_kg
    /// - partners: 车辆快照
    ///
    /// # 返回
    /// 运行结果汇总
    pub async fn run(
        &self,
        warehouse: &Warehouse,
        pending_orders: Vec<CustomerOrder>,
        stock: &HashMap<String, i64>,
        weights: &HashMap<String, f64>,
        partners: Vec<DeliveryPartner>,
    ) -> DispatchRunResult {
        let warehouse_location = match warehouse.location {
            Some(loc) => loc,
            // 调用方已校验；这里兜底为空结果
            None => {
                warn!(warehouse_id = %warehouse.id, "仓库坐标缺失，无法规划");
                return DispatchRunResult::default();
            }
        };

        info!(
            warehouse_id = %warehouse.id,
            pending_orders = pending_orders.len(),
            partners = partners.len(),
            "开始执行派车规划"
        );

        // 步骤1: 履约过滤
        let fulfillable = self.filter.filter(pending_orders, stock, weights);
        let mut result = DispatchRunResult {
            fulfillable_orders: fulfillable.len(),
            ..Default::default()
        };
        if fulfillable.is_empty() {
            // 无可履约订单: 提前终止，不触达求解器
            info!(warehouse_id = %warehouse.id, "无可履约订单，提前结束");
            return result;
        }

        // 步骤2: first-fit 装箱
        let packed = self.packer.pack(fulfillable, partners);
        result.unassigned_order_ids = packed
            .unassigned
            .iter()
            .map(|o| o.order.id.clone())
            .collect();

        // 步骤3-5: 逐车 构建请求 -> 求解 -> 回写（串行，互不影响）
        for load in &packed.loads {
            let request = match self.builder.build(&warehouse_location, load) {
                Some(req) => req,
                // 空载车辆直接跳过
                None => continue,
            };
            result.loads_attempted += 1;

            let solved = match self.solver.solve(&request).await {
                Ok(solved) => solved,
                Err(e) => {
                    warn!(
                        partner_id = %load.partner.id,
                        error = %e,
                        "求解失败，本车订单保持 Pending，继续处理其余装载"
                    );
                    result
                        .failed_loads
                        .push((load.partner.id.clone(), e.to_string()));
                    continue;
                }
            };

            debug!(
                partner_id = %load.partner.id,
                stops = solved.service_order_ids().len(),
                distance_m = solved.distance_meters,
                "求解成功，开始回写"
            );

            match self.reconciler.reconcile(&warehouse.id, load, &solved) {
                Ok(report) => {
                    // 路线已持久化即计入成功；report.error 为部分失败，已在回写层记录
                    result.routes_created += 1;
                    if let Some(e) = report.error {
                        result
                            .failed_loads
                            .push((load.partner.id.clone(), format!("回写部分失败: {}", e)));
                    }
                }
                Err(e) => {
                    warn!(
                        partner_id = %load.partner.id,
                        error = %e,
                        "路线写入失败，放弃本装载"
                    );
                    result
                        .failed_loads
                        .push((load.partner.id.clone(), e.to_string()));
                }
            }
        }

        info!(
            warehouse_id = %warehouse.id,
            fulfillable = result.fulfillable_orders,
            attempted = result.loads_attempted,
            routes_created = result.routes_created,
            "派车规划结束"
        );
        result
    }
}
