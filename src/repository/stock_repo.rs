// ==========================================
// 仓储物流调度系统 - 库存数据仓储
// ==========================================
// 红线: decrement 必须是原子条件更新，禁止读改写
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// StockRepository - 库存仓储
// ==========================================

/// 库存仓储
/// 职责: 管理 warehouse_stock 表的数据访问
pub struct StockRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StockRepository {
    /// 创建新的库存仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取单仓库的库存快照: product_id -> quantity
    ///
    /// 规划运行开始时读取一次，运行中不再重读（时点快照）。
    pub fn stock_map(&self, warehouse_id: &str) -> RepositoryResult<HashMap<String, i64>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT product_id, quantity FROM warehouse_stock WHERE warehouse_id = ?1",
        )?;

        let map = stmt
            .query_map(params![warehouse_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(map)
    }

    /// 查询单个库存行数量（不存在返回 None）
    pub fn get_quantity(
        &self,
        warehouse_id: &str,
        product_id: &str,
    ) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;

        let qty = conn
            .query_row(
                "SELECT quantity FROM warehouse_stock WHERE warehouse_id = ?1 AND product_id = ?2",
                params![warehouse_id, product_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        Ok(qty)
    }

    /// 写入/覆盖库存行（主数据维护用）
    pub fn upsert(
        &self,
        warehouse_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO warehouse_stock (warehouse_id, product_id, quantity)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (warehouse_id, product_id) DO UPDATE SET quantity = excluded.quantity
            "#,
            params![warehouse_id, product_id, quantity],
        )?;

        Ok(())
    }

    /// 原子扣减库存
    ///
    /// 单条条件 UPDATE，余量不足时不更新任何行并返回 InsufficientStock。
    /// 本核心不做运行级加锁，负库存只能靠这里的条件更新兜底。
    ///
    /// # 参数
    /// - product_id: 产品 ID
    /// - warehouse_id: 仓库 ID
    /// - amount: 扣减数量（必须 > 0）
    pub fn decrement(
        &self,
        product_id: &str,
        warehouse_id: &str,
        amount: i64,
    ) -> RepositoryResult<()> {
        if amount <= 0 {
            return Err(RepositoryError::ValidationError(format!(
                "扣减数量必须为正数: {}",
                amount
            )));
        }

        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"
            UPDATE warehouse_stock
            SET quantity = quantity - ?1
            WHERE warehouse_id = ?2 AND product_id = ?3 AND quantity >= ?1
            "#,
            params![amount, warehouse_id, product_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::InsufficientStock {
                product_id: product_id.to_string(),
                warehouse_id: warehouse_id.to_string(),
                requested: amount,
            });
        }

        Ok(())
    }

    /// 原子加量库存（入库收货侧使用，与 decrement 对称）
    ///
    /// 库存行不存在时自动创建。
    pub fn increment(
        &self,
        product_id: &str,
        warehouse_id: &str,
        amount: i64,
    ) -> RepositoryResult<()> {
        if amount <= 0 {
            return Err(RepositoryError::ValidationError(format!(
                "加量数量必须为正数: {}",
                amount
            )));
        }

        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO warehouse_stock (warehouse_id, product_id, quantity)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (warehouse_id, product_id) DO UPDATE SET quantity = quantity + ?3
            "#,
            params![warehouse_id, product_id, amount],
        )?;

        Ok(())
    }
}
