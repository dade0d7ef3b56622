// ==========================================
// 仓储物流调度系统 - 产品数据仓储
// ==========================================

use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 产品仓储
/// 职责: 管理 products 表的数据访问
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
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

    /// 查询全部产品
    pub fn list(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT id, name, weight_kg FROM products ORDER BY name ASC")?;

        let products = stmt
            .query_map([], |row| {
                Ok(Product {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    weight_kg: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// 读取产品单重快照: product_id -> weight_kg
    pub fn weight_map(&self) -> RepositoryResult<HashMap<String, f64>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare("SELECT id, weight_kg FROM products")?;

        let map = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(map)
    }

    /// 新建产品
    pub fn create(&self, name: &str, weight_kg: f64) -> RepositoryResult<String> {
        if weight_kg < 0.0 {
            return Err(RepositoryError::ValidationError(
                "weight_kg 不能为负数".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO products (id, name, weight_kg) VALUES (?1, ?2, ?3)",
            params![id, name, weight_kg],
        )?;

        Ok(id)
    }
}
