// ==========================================
// 仓储物流调度系统 - 配送伙伴数据仓储
// ==========================================

use crate::domain::partner::DeliveryPartner;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 配送伙伴仓储
/// 职责: 管理 delivery_partners 表的 CRUD 操作
pub struct PartnerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PartnerRepository {
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

    /// 查询全部配送伙伴（规划快照，按名称排序保证扫描顺序稳定）
    pub fn list(&self) -> RepositoryResult<Vec<DeliveryPartner>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, vehicle_type, max_capacity_kg
            FROM delivery_partners
            ORDER BY name ASC, id ASC
            "#,
        )?;

        let partners = stmt
            .query_map([], |row| {
                Ok(DeliveryPartner {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    vehicle_type: row.get(2)?,
                    max_capacity_kg: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(partners)
    }

    /// 新建配送伙伴
    pub fn create(
        &self,
        name: &str,
        vehicle_type: Option<&str>,
        max_capacity_kg: f64,
    ) -> RepositoryResult<String> {
        if max_capacity_kg <= 0.0 {
            return Err(RepositoryError::ValidationError(
                "max_capacity_kg 必须为正数".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO delivery_partners (id, name, vehicle_type, max_capacity_kg)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![id, name, vehicle_type, max_capacity_kg],
        )?;

        Ok(id)
    }

    /// 更新配送伙伴
    pub fn update(&self, partner: &DeliveryPartner) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"
            UPDATE delivery_partners
            SET name = ?2, vehicle_type = ?3, max_capacity_kg = ?4
            WHERE id = ?1
            "#,
            params![
                partner.id,
                partner.name,
                partner.vehicle_type,
                partner.max_capacity_kg
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "DeliveryPartner".to_string(),
                id: partner.id.clone(),
            });
        }
        Ok(())
    }

    /// 删除配送伙伴
    pub fn delete(&self, partner_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "DELETE FROM delivery_partners WHERE id = ?1",
            params![partner_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "DeliveryPartner".to_string(),
                id: partner_id.to_string(),
            });
        }
        Ok(())
    }
}
