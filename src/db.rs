// ==========================================
// 仓储物流调度系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema（幂等，全部 CREATE TABLE IF NOT EXISTS）
///
/// 表结构：
/// - 主数据: warehouses / products / delivery_partners
/// - 库存: warehouse_stock（(warehouse, product) 唯一）
/// - 订单: customer_orders / order_items
/// - 路线: delivery_routes / route_stops
/// - 入库: inbound_shipments
/// - 配置: config_kv
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS warehouses (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            location TEXT
        );

        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            weight_kg REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS delivery_partners (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            vehicle_type TEXT,
            max_capacity_kg REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS warehouse_stock (
            warehouse_id TEXT NOT NULL REFERENCES warehouses(id),
            product_id TEXT NOT NULL REFERENCES products(id),
            quantity INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (warehouse_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS customer_orders (
            id TEXT PRIMARY KEY,
            customer_name TEXT NOT NULL,
            delivery_address TEXT NOT NULL DEFAULT 'N/A',
            delivery_location TEXT,
            status TEXT NOT NULL DEFAULT 'Pending',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS order_items (
            id TEXT PRIMARY KEY,
            order_id TEXT NOT NULL REFERENCES customer_orders(id) ON DELETE CASCADE,
            product_id TEXT NOT NULL REFERENCES products(id),
            quantity INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS delivery_routes (
            id TEXT PRIMARY KEY,
            delivery_partner_id TEXT NOT NULL REFERENCES delivery_partners(id),
            warehouse_id TEXT NOT NULL REFERENCES warehouses(id),
            route_geometry TEXT NOT NULL,
            total_duration_seconds REAL NOT NULL DEFAULT 0,
            total_distance_meters REAL NOT NULL DEFAULT 0,
            traffic_segments TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS route_stops (
            id TEXT PRIMARY KEY,
            route_id TEXT NOT NULL REFERENCES delivery_routes(id) ON DELETE CASCADE,
            order_id TEXT NOT NULL REFERENCES customer_orders(id),
            stop_number INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS inbound_shipments (
            id TEXT PRIMARY KEY,
            product_id TEXT NOT NULL REFERENCES products(id),
            warehouse_id TEXT NOT NULL REFERENCES warehouses(id),
            quantity INTEGER NOT NULL,
            eta TEXT,
            status TEXT NOT NULL DEFAULT 'In Transit',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}
