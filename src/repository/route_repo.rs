// ==========================================
// 仓储物流调度系统 - 配送路线数据仓储
// ==========================================
// 路线一经创建不再更新；停靠点随路线批量写入
// ==========================================

use crate::domain::route::{DeliveryRoute, RouteStop};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

fn parse_db_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
}

/// 新路线的写入参数（ID 与 created_at 由仓储生成）
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub delivery_partner_id: String,
    pub warehouse_id: String,
    pub route_geometry: serde_json::Value,
    pub total_duration_seconds: f64,
    pub total_distance_meters: f64,
    pub traffic_segments: Option<serde_json::Value>,
}

// ==========================================
// RouteRepository - 路线仓储
// ==========================================

/// 路线仓储
/// 职责: 管理 delivery_routes / route_stops 表的数据访问
pub struct RouteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RouteRepository {
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

    /// 写入一条配送路线
    ///
    /// # 返回
    /// - Ok(String): 新路线 ID
    pub fn insert_route(&self, route: &NewRoute) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO delivery_routes (
                id, delivery_partner_id, warehouse_id, route_geometry,
                total_duration_seconds, total_distance_meters, traffic_segments
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                id,
                route.delivery_partner_id,
                route.warehouse_id,
                route.route_geometry.to_string(),
                route.total_duration_seconds,
                route.total_distance_meters,
                route.traffic_segments.as_ref().map(|v| v.to_string()),
            ],
        )?;

        Ok(id)
    }

    /// 批量写入路线停靠点
    ///
    /// # 参数
    /// - route_id: 所属路线 ID
    /// - order_ids_in_visit_order: 按访问顺序排列的订单 ID；
    ///   stop_number 按该顺序从 1 开始编号
    pub fn insert_stops(
        &self,
        route_id: &str,
        order_ids_in_visit_order: &[String],
    ) -> RepositoryResult<Vec<RouteStop>> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut stops = Vec::with_capacity(order_ids_in_visit_order.len());
        for (index, order_id) in order_ids_in_visit_order.iter().enumerate() {
            let stop = RouteStop {
                id: Uuid::new_v4().to_string(),
                route_id: route_id.to_string(),
                order_id: order_id.clone(),
                stop_number: (index + 1) as i64,
            };
            tx.execute(
                r#"
                INSERT INTO route_stops (id, route_id, order_id, stop_number)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![stop.id, stop.route_id, stop.order_id, stop.stop_number],
            )?;
            stops.push(stop);
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(stops)
    }

    /// 查询全部路线（展示层列表）
    pub fn list_routes(&self) -> RepositoryResult<Vec<DeliveryRoute>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, delivery_partner_id, warehouse_id, route_geometry,
                   total_duration_seconds, total_distance_meters, traffic_segments, created_at
            FROM delivery_routes
            ORDER BY created_at DESC, id ASC
            "#,
        )?;

        let routes = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(Self::row_to_route)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(routes)
    }

    /// 查询单条路线及其停靠点（按 stop_number 升序）
    pub fn find_route_with_stops(
        &self,
        route_id: &str,
    ) -> RepositoryResult<(DeliveryRoute, Vec<RouteStop>)> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                r#"
                SELECT id, delivery_partner_id, warehouse_id, route_geometry,
                       total_duration_seconds, total_distance_meters, traffic_segments, created_at
                FROM delivery_routes
                WHERE id = ?1
                "#,
                params![route_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, f64>(5)?,
                        row.get::<_, Option<String>>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "DeliveryRoute".to_string(),
                    id: route_id.to_string(),
                },
                other => other.into(),
            })?;

        let route = Self::row_to_route(row)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, route_id, order_id, stop_number
            FROM route_stops
            WHERE route_id = ?1
            ORDER BY stop_number ASC
            "#,
        )?;
        let stops = stmt
            .query_map(params![route_id], |row| {
                Ok(RouteStop {
                    id: row.get(0)?,
                    route_id: row.get(1)?,
                    order_id: row.get(2)?,
                    stop_number: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((route, stops))
    }

    /// 查询指定订单的停靠点（用于一致性校验）
    pub fn find_stops_by_order(&self, order_id: &str) -> RepositoryResult<Vec<RouteStop>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, route_id, order_id, stop_number FROM route_stops WHERE order_id = ?1",
        )?;
        let stops = stmt
            .query_map(params![order_id], |row| {
                Ok(RouteStop {
                    id: row.get(0)?,
                    route_id: row.get(1)?,
                    order_id: row.get(2)?,
                    stop_number: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stops)
    }

    #[allow(clippy::type_complexity)]
    fn row_to_route(
        row: (
            String,
            String,
            String,
            String,
            f64,
            f64,
            Option<String>,
            String,
        ),
    ) -> RepositoryResult<DeliveryRoute> {
        let route_geometry = serde_json::from_str(&row.3)?;
        let traffic_segments = match row.6 {
            Some(s) => Some(serde_json::from_str(&s)?),
            None => None,
        };

        Ok(DeliveryRoute {
            id: row.0,
            delivery_partner_id: row.1,
            warehouse_id: row.2,
            route_geometry,
            total_duration_seconds: row.4,
            total_distance_meters: row.5,
            traffic_segments,
            created_at: parse_db_datetime(&row.7),
        })
    }
}
