// ==========================================
// 仓储物流调度系统 - 订单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::order::{CustomerOrder, OrderItem};
use crate::domain::types::{parse_geojson_point, to_geojson_point, GeoPoint, OrderStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 解析数据库 datetime 文本（datetime('now') 格式）
fn parse_db_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
}

// ==========================================
// OrderRepository - 订单仓储
// ==========================================

/// 订单仓储
/// 职责: 管理 customer_orders / order_items 表的数据访问
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    /// 创建新的订单仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部待派订单（含明细行与解析后的配送坐标）
    ///
    /// 仅返回 status = 'Pending' 的订单，按创建时间升序（先到先服务）。
    /// 坐标不合法的订单仍会返回（delivery_location = None），
    /// 由履约过滤引擎负责排除。
    ///
    /// # 返回
    /// - Ok(Vec<CustomerOrder>): 待派订单列表
    /// - Err: 数据库错误
    pub fn list_pending_with_location(&self) -> RepositoryResult<Vec<CustomerOrder>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, customer_name, delivery_address, status, created_at, delivery_location
            FROM customer_orders
            WHERE status = 'Pending'
            ORDER BY created_at ASC, id ASC
            "#,
        )?;

        struct Row {
            id: String,
            customer_name: String,
            delivery_address: String,
            status: String,
            created_at: String,
            delivery_location: Option<String>,
        }

        let rows = stmt
            .query_map([], |row| {
                Ok(Row {
                    id: row.get(0)?,
                    customer_name: row.get(1)?,
                    delivery_address: row.get(2)?,
                    status: row.get(3)?,
                    created_at: row.get(4)?,
                    delivery_location: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut item_stmt = conn.prepare(
            r#"
            SELECT id, order_id, product_id, quantity
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id ASC
            "#,
        )?;

        let mut orders = Vec::with_capacity(rows.len());
        for r in rows {
            let items = item_stmt
                .query_map(params![r.id], |row| {
                    Ok(OrderItem {
                        id: row.get(0)?,
                        order_id: row.get(1)?,
                        product_id: row.get(2)?,
                        quantity: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let delivery_location = r
                .delivery_location
                .as_deref()
                .and_then(|s| serde_json::from_str::<serde_json::Value>(s).ok())
                .as_ref()
                .and_then(parse_geojson_point);

            orders.push(CustomerOrder {
                id: r.id,
                customer_name: r.customer_name,
                delivery_address: r.delivery_address,
                status: OrderStatus::parse(&r.status).unwrap_or(OrderStatus::Pending),
                created_at: parse_db_datetime(&r.created_at),
                delivery_location,
                items,
            });
        }

        Ok(orders)
    }

    /// 按 ID 查询单个订单（含明细行）
    pub fn find_by_id(&self, order_id: &str) -> RepositoryResult<CustomerOrder> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                r#"
                SELECT id, customer_name, delivery_address, status, created_at, delivery_location
                FROM customer_orders
                WHERE id = ?1
                "#,
                params![order_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "CustomerOrder".to_string(),
                    id: order_id.to_string(),
                },
                other => other.into(),
            })?;

        let mut item_stmt = conn.prepare(
            "SELECT id, order_id, product_id, quantity FROM order_items WHERE order_id = ?1 ORDER BY id ASC",
        )?;
        let items = item_stmt
            .query_map(params![order_id], |row| {
                Ok(OrderItem {
                    id: row.get(0)?,
                    order_id: row.get(1)?,
                    product_id: row.get(2)?,
                    quantity: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let delivery_location = row
            .5
            .as_deref()
            .and_then(|s| serde_json::from_str::<serde_json::Value>(s).ok())
            .as_ref()
            .and_then(parse_geojson_point);

        Ok(CustomerOrder {
            id: row.0,
            customer_name: row.1,
            delivery_address: row.2,
            status: OrderStatus::parse(&row.3).unwrap_or(OrderStatus::Pending),
            created_at: parse_db_datetime(&row.4),
            delivery_location,
            items,
        })
    }

    /// 创建订单（订单 + 明细行同事务写入）
    ///
    /// # 参数
    /// - customer_name: 客户名称
    /// - delivery_address: 展示用地址文本（缺省存 "N/A"）
    /// - location: 配送坐标（必填，地理编码在系统边界外完成）
    /// - items: (product_id, quantity) 列表
    ///
    /// # 返回
    /// - Ok(String): 新订单 ID
    pub fn create(
        &self,
        customer_name: &str,
        delivery_address: Option<&str>,
        location: &GeoPoint,
        items: &[(String, i64)],
    ) -> RepositoryResult<String> {
        if customer_name.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "customer_name 不能为空".to_string(),
            ));
        }
        if items.is_empty() {
            return Err(RepositoryError::ValidationError(
                "订单至少需要一个明细行".to_string(),
            ));
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let order_id = Uuid::new_v4().to_string();
        let location_json = to_geojson_point(location).to_string();

        tx.execute(
            r#"
            INSERT INTO customer_orders (id, customer_name, delivery_address, delivery_location, status)
            VALUES (?1, ?2, ?3, ?4, 'Pending')
            "#,
            params![
                order_id,
                customer_name,
                delivery_address.unwrap_or("N/A"),
                location_json
            ],
        )?;

        for (product_id, quantity) in items {
            tx.execute(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![Uuid::new_v4().to_string(), order_id, product_id, quantity],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(order_id)
    }

    /// 批量更新订单状态（单条 UPDATE，按 ID 集合）
    ///
    /// # 参数
    /// - order_ids: 订单 ID 集合
    /// - status: 目标状态
    ///
    /// # 返回
    /// - Ok(usize): 实际更新行数
    pub fn update_statuses(
        &self,
        order_ids: &[String],
        status: OrderStatus,
    ) -> RepositoryResult<usize> {
        if order_ids.is_empty() {
            return Ok(0);
        }

        let conn = self.get_conn()?;

        let placeholders = (0..order_ids.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE customer_orders SET status = ?1 WHERE id IN ({})",
            placeholders
        );

        let mut values: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(order_ids.len() + 1);
        let status_str = status.as_str();
        values.push(&status_str);
        for id in order_ids {
            values.push(id);
        }

        let affected = conn.execute(&sql, params_from_iter(values))?;
        Ok(affected)
    }
}
