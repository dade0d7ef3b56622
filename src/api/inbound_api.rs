// ==========================================
// 仓储物流调度系统 - 入库收货 API
// ==========================================
// 职责: 入库单创建与收货的薄封装
// ==========================================

use crate::api::error::ApiResult;
use crate::repository::InboundRepository;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// 入库收货 API
pub struct InboundApi {
    inbound_repo: Arc<InboundRepository>,
}

impl InboundApi {
    pub fn new(inbound_repo: Arc<InboundRepository>) -> Self {
        Self { inbound_repo }
    }

    /// 创建入库单
    pub fn create_shipment(
        &self,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
        eta: Option<NaiveDate>,
    ) -> ApiResult<String> {
        let id = self
            .inbound_repo
            .create(product_id, warehouse_id, quantity, eta)?;
        Ok(id)
    }

    /// 收货（存储侧原子操作: 标记 Received + 库存加量）
    pub fn receive_shipment(&self, shipment_id: &str) -> ApiResult<()> {
        self.inbound_repo.receive(shipment_id)?;
        info!(shipment_id, "入库收货完成，库存已加量");
        Ok(())
    }
}
