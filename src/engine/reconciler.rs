// ==========================================
// 仓储物流调度系统 - 计划回写引擎
// ==========================================
// 职责: 把一个求解成功的车辆装载落库，顺序:
// 1) 写路线  2) 写停靠点  3) 批量改订单状态  4) 逐项原子扣库存
// 步骤 2-4 相对步骤 1 不要求原子:
// 中途失败记日志并跳过该装载的剩余步骤，运行继续。
// 已知且接受的不一致窗口，仅靠存储侧原子扣减兜底，不做回滚。
// ==========================================

use crate::domain::route::VehicleLoad;
use crate::domain::types::OrderStatus;
use crate::engine::traffic::simulate_traffic;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{NewRoute, OrderRepository, RouteRepository, StockRepository};
use crate::solver::types::SolvedRoute;
use std::sync::Arc;
use tracing::{error, info};

/// 单装载回写结果
///
/// route_id 已持久化即计入成功路线数；error 记录步骤 2-4 的
/// 首个失败（此时 stops/状态/库存可能只完成了一部分）。
#[derive(Debug)]
pub struct ReconcileReport {
    pub route_id: String,
    pub stops_created: usize,
    pub statuses_updated: usize,
    pub stock_decrements: usize,
    pub error: Option<RepositoryError>,
}

// ==========================================
// PlanReconciler - 计划回写引擎
// ==========================================
pub struct PlanReconciler {
    order_repo: Arc<OrderRepository>,
    stock_repo: Arc<StockRepository>,
    route_repo: Arc<RouteRepository>,
}

impl PlanReconciler {
    pub fn new(
        order_repo: Arc<OrderRepository>,
        stock_repo: Arc<StockRepository>,
        route_repo: Arc<RouteRepository>,
    ) -> Self {
        Self {
            order_repo,
            stock_repo,
            route_repo,
        }
    }

    /// 回写一个求解成功的车辆装载
    ///
    /// # 参数
    /// - warehouse_id: 仓库 ID
    /// - load: 车辆装载
    /// - solved: 求解结果
    ///
    /// # 返回
    /// - Ok(ReconcileReport): 路线已持久化（后续步骤的失败在 report.error 中）
    /// - Err: 路线写入失败，本装载完全放弃（无停靠点/状态/库存写入）
    pub fn reconcile(
        &self,
        warehouse_id: &str,
        load: &VehicleLoad,
        solved: &SolvedRoute,
    ) -> RepositoryResult<ReconcileReport> {
        // 步骤1: 写路线（含模拟交通叠加层）。失败 = 放弃本装载
        let traffic_segments = simulate_traffic(&solved.geometry);
        let route_id = self.route_repo.insert_route(&NewRoute {
            delivery_partner_id: load.partner.id.clone(),
            warehouse_id: warehouse_id.to_string(),
            route_geometry: solved.geometry.clone(),
            total_duration_seconds: solved.duration_seconds,
            total_distance_meters: solved.distance_meters,
            traffic_segments,
        })?;

        let mut report = ReconcileReport {
            route_id: route_id.clone(),
            stops_created: 0,
            statuses_updated: 0,
            stock_decrements: 0,
            error: None,
        };

        // 步骤2: 按求解访问顺序写停靠点（仅 service 活动，编号 1..N）
        let visit_order = solved.service_order_ids();
        match self.route_repo.insert_stops(&route_id, &visit_order) {
            Ok(stops) => report.stops_created = stops.len(),
            Err(e) => {
                error!(route_id = %route_id, error = %e, "停靠点写入失败，跳过本装载剩余回写");
                report.error = Some(e);
                return Ok(report);
            }
        }

        // 步骤3: 批量订单状态 Pending -> Out for Delivery
        let order_ids: Vec<String> = load.orders.iter().map(|o| o.order.id.clone()).collect();
        match self
            .order_repo
            .update_statuses(&order_ids, OrderStatus::OutForDelivery)
        {
            Ok(n) => report.statuses_updated = n,
            Err(e) => {
                error!(route_id = %route_id, error = %e, "订单状态更新失败，跳过本装载剩余回写");
                report.error = Some(e);
                return Ok(report);
            }
        }

        // 步骤4: 逐 (product, quantity) 原子扣减库存
        for order in &load.orders {
            for item in &order.order.items {
                match self
                    .stock_repo
                    .decrement(&item.product_id, warehouse_id, item.quantity)
                {
                    Ok(()) => report.stock_decrements += 1,
                    Err(e) => {
                        error!(
                            route_id = %route_id,
                            order_id = %order.order.id,
                            product_id = %item.product_id,
                            error = %e,
                            "库存扣减失败，跳过本装载剩余回写"
                        );
                        report.error = Some(e);
                        return Ok(report);
                    }
                }
            }
        }

        info!(
            route_id = %route_id,
            stops = report.stops_created,
            orders = report.statuses_updated,
            "装载回写完成"
        );
        Ok(report)
    }
}
