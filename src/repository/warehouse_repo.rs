// ==========================================
// 仓储物流调度系统 - 仓库数据仓储
// ==========================================

use crate::domain::types::{parse_geojson_point, to_geojson_point, GeoPoint};
use crate::domain::warehouse::Warehouse;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 仓库仓储
/// 职责: 管理 warehouses 表的数据访问
pub struct WarehouseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WarehouseRepository {
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

    fn row_to_warehouse(
        id: String,
        name: String,
        location: Option<String>,
    ) -> Warehouse {
        let location = location
            .as_deref()
            .and_then(|s| serde_json::from_str::<serde_json::Value>(s).ok())
            .as_ref()
            .and_then(parse_geojson_point);
        Warehouse { id, name, location }
    }

    /// 按 ID 查询仓库（不存在返回 None）
    pub fn find_by_id(&self, warehouse_id: &str) -> RepositoryResult<Option<Warehouse>> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                "SELECT id, name, location FROM warehouses WHERE id = ?1",
                params![warehouse_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(id, name, location)| Self::row_to_warehouse(id, name, location)))
    }

    /// 查询全部仓库
    pub fn list(&self) -> RepositoryResult<Vec<Warehouse>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT id, name, location FROM warehouses ORDER BY name ASC")?;

        let warehouses = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(id, name, location)| Self::row_to_warehouse(id, name, location))
            .collect();

        Ok(warehouses)
    }

    /// 新建仓库
    pub fn create(&self, name: &str, location: Option<&GeoPoint>) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();
        let location_json = location.map(|p| to_geojson_point(p).to_string());

        conn.execute(
            "INSERT INTO warehouses (id, name, location) VALUES (?1, ?2, ?3)",
            params![id, name, location_json],
        )?;

        Ok(id)
    }
}
