// ==========================================
// 仓储物流调度系统 - 派车规划 API
// ==========================================
// 职责: 调度管线的对外入口。
// 校验输入 -> 读取运行快照（一次） -> 调用编排器 -> 折算对外结果
// 错误语义:
// - 输入错误/仓库不存在: 运行未开始，无任何副作用
// - 快照读取失败: 在任何写入前中止，整轮报错
// - 有装载尝试但零路线: RoutingFailed
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::engine::orchestrator::{DispatchOrchestrator, DispatchRunResult};
use crate::repository::{
    OrderRepository, PartnerRepository, ProductRepository, StockRepository, WarehouseRepository,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// 对外运行结果
#[derive(Debug)]
pub enum DispatchOutcome {
    /// 没有任何待派订单（无事可做，不是错误）
    NoPendingOrders,
    /// 有待派订单但无一可履约（无事可做，不是错误）
    NoFulfillableOrders,
    /// 至少一条路线持久化
    RoutesPlanned {
        routes_created: usize,
        /// 无车可装、留待下轮的订单 ID
        unassigned_order_ids: Vec<String>,
    },
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::NoPendingOrders => write!(f, "No pending orders found."),
            DispatchOutcome::NoFulfillableOrders => {
                write!(f, "No fulfillable orders found (check stock).")
            }
            DispatchOutcome::RoutesPlanned { routes_created, .. } => {
                write!(
                    f,
                    "Optimization complete! {} routes were planned.",
                    routes_created
                )
            }
        }
    }
}

// ==========================================
// DispatchApi - 派车规划 API
// ==========================================

/// 派车规划 API
///
/// 一次调用 = 单仓库的一轮规划，同步单请求单响应。
/// 同仓库并发调用会在库存快照/装箱上竞争（接受的设计限制），
/// 负库存由存储侧原子扣减兜底。
pub struct DispatchApi {
    warehouse_repo: Arc<WarehouseRepository>,
    order_repo: Arc<OrderRepository>,
    stock_repo: Arc<StockRepository>,
    product_repo: Arc<ProductRepository>,
    partner_repo: Arc<PartnerRepository>,
    orchestrator: DispatchOrchestrator,
}

impl DispatchApi {
    /// 创建新的 DispatchApi 实例
    pub fn new(
        warehouse_repo: Arc<WarehouseRepository>,
        order_repo: Arc<OrderRepository>,
        stock_repo: Arc<StockRepository>,
        product_repo: Arc<ProductRepository>,
        partner_repo: Arc<PartnerRepository>,
        orchestrator: DispatchOrchestrator,
    ) -> Self {
        Self {
            warehouse_repo,
            order_repo,
            stock_repo,
            product_repo,
            partner_repo,
            orchestrator,
        }
    }

    /// 为指定仓库规划出库派车
    ///
    /// # 参数
    /// - warehouse_id: 仓库 ID
    ///
    /// # 返回
    /// - Ok(DispatchOutcome): 路线数 / 无事可做
    /// - Err(ApiError): 输入错误、读取失败或整轮求解失败
    pub async fn plan_routes(&self, warehouse_id: &str) -> ApiResult<DispatchOutcome> {
        // 输入校验（运行未开始，无副作用）
        let warehouse_id = warehouse_id.trim();
        if warehouse_id.is_empty() {
            return Err(ApiError::InvalidInput("warehouse_id 不能为空".to_string()));
        }

        let warehouse = self
            .warehouse_repo
            .find_by_id(warehouse_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Warehouse (id={})", warehouse_id)))?;
        if warehouse.location.is_none() {
            return Err(ApiError::InvalidInput(format!(
                "仓库坐标缺失或不合法: {}",
                warehouse_id
            )));
        }

        // 运行快照: 开始时读取一次，运行中不重读
        let pending_orders = self.order_repo.list_pending_with_location()?;
        if pending_orders.is_empty() {
            info!(warehouse_id, "没有待派订单");
            return Ok(DispatchOutcome::NoPendingOrders);
        }

        let stock = self.stock_repo.stock_map(&warehouse.id)?;
        let weights = self.product_repo.weight_map()?;
        let partners = self.partner_repo.list()?;

        let result: DispatchRunResult = self
            .orchestrator
            .run(&warehouse, pending_orders, &stock, &weights, partners)
            .await;

        if result.fulfillable_orders == 0 {
            return Ok(DispatchOutcome::NoFulfillableOrders);
        }
        if result.routes_created == 0 {
            return Err(ApiError::RoutingFailed {
                attempted: result.loads_attempted,
            });
        }

        Ok(DispatchOutcome::RoutesPlanned {
            routes_created: result.routes_created,
            unassigned_order_ids: result.unassigned_order_ids,
        })
    }
}
