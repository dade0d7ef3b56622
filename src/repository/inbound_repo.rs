// ==========================================
// 仓储物流调度系统 - 入库单数据仓储
// ==========================================
// 收货 = 单事务内「标记 Received + 库存加量」，
// 与出库侧 StockRepository::decrement 互为对称的原子操作
// ==========================================

use crate::domain::inbound::InboundShipment;
use crate::domain::types::ShipmentStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

fn parse_db_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
}

/// 入库单仓储
/// 职责: 管理 inbound_shipments 表的数据访问与收货原子操作
pub struct InboundRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InboundRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建入库单（状态 In Transit）
    pub fn create(
        &self,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
        eta: Option<NaiveDate>,
    ) -> RepositoryResult<String> {
        if quantity <= 0 {
            return Err(RepositoryError::ValidationError(
                "入库数量必须为正数".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO inbound_shipments (id, product_id, warehouse_id, quantity, eta, status)
            VALUES (?1, ?2, ?3, ?4, ?5, 'In Transit')
            "#,
            params![
                id,
                product_id,
                warehouse_id,
                quantity,
                eta.map(|d| d.format("%Y-%m-%d").to_string())
            ],
        )?;

        Ok(id)
    }

    /// 按 ID 查询入库单
    pub fn find_by_id(&self, shipment_id: &str) -> RepositoryResult<Option<InboundShipment>> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                r#"
                SELECT id, product_id, warehouse_id, quantity, eta, status, created_at
                FROM inbound_shipments
                WHERE id = ?1
                "#,
                params![shipment_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|r| InboundShipment {
            id: r.0,
            product_id: r.1,
            warehouse_id: r.2,
            quantity: r.3,
            eta: r
                .4
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            status: ShipmentStatus::parse(&r.5).unwrap_or(ShipmentStatus::InTransit),
            created_at: parse_db_datetime(&r.6),
        }))
    }

    /// 收货（原子操作）
    ///
    /// 单事务内:
    /// 1. 条件更新入库单状态 In Transit -> Received（已收货的单拒绝二次收货）
    /// 2. 对应库存行加量（不存在则创建）
    ///
    /// # 返回
    /// - Ok(()): 收货完成，库存已加量
    /// - Err(NotFound): 入库单不存在
    /// - Err(InvalidStateTransition): 入库单已是 Received
    pub fn receive(&self, shipment_id: &str) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let shipment = tx
            .query_row(
                r#"
                SELECT product_id, warehouse_id, quantity, status
                FROM inbound_shipments
                WHERE id = ?1
                "#,
                params![shipment_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "InboundShipment".to_string(),
                id: shipment_id.to_string(),
            })?;

        // 条件更新，防止并发双收
        let affected = tx.execute(
            "UPDATE inbound_shipments SET status = 'Received' WHERE id = ?1 AND status = 'In Transit'",
            params![shipment_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::InvalidStateTransition {
                from: shipment.3,
                to: ShipmentStatus::Received.as_str().to_string(),
            });
        }

        tx.execute(
            r#"
            INSERT INTO warehouse_stock (warehouse_id, product_id, quantity)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (warehouse_id, product_id) DO UPDATE SET quantity = quantity + ?3
            "#,
            params![shipment.1, shipment.0, shipment.2],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(())
    }
}
