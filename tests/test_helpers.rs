// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成、
// 求解器测试替身等功能
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashSet;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use warehouse_dispatch::db::{configure_sqlite_connection, init_schema};
use warehouse_dispatch::solver::{
    ActivityType, RouteSolver, SolvedActivity, SolvedRoute, SolverError, SolverRequest,
    SolverResult,
};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（仓储层统一使用 Arc<Mutex<Connection>>）
pub fn open_shared_conn(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = warehouse_dispatch::db::open_sqlite_connection(db_path).unwrap();
    Arc::new(Mutex::new(conn))
}

// ==========================================
// 测试数据生成
// ==========================================

/// 写入仓库（坐标以 GeoJSON Point 存储）
pub fn seed_warehouse(conn: &Arc<Mutex<Connection>>, id: &str, lat: f64, lng: f64) {
    let location = json!({"type": "Point", "coordinates": [lng, lat]}).to_string();
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO warehouses (id, name, location) VALUES (?1, ?2, ?3)",
            params![id, format!("仓库-{}", id), location],
        )
        .unwrap();
}

/// 写入无坐标的仓库
pub fn seed_warehouse_without_location(conn: &Arc<Mutex<Connection>>, id: &str) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO warehouses (id, name, location) VALUES (?1, ?2, NULL)",
            params![id, format!("仓库-{}", id)],
        )
        .unwrap();
}

/// 写入产品
pub fn seed_product(conn: &Arc<Mutex<Connection>>, id: &str, weight_kg: f64) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO products (id, name, weight_kg) VALUES (?1, ?2, ?3)",
            params![id, format!("产品-{}", id), weight_kg],
        )
        .unwrap();
}

/// 写入库存行
pub fn seed_stock(conn: &Arc<Mutex<Connection>>, warehouse_id: &str, product_id: &str, qty: i64) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO warehouse_stock (warehouse_id, product_id, quantity) VALUES (?1, ?2, ?3)",
            params![warehouse_id, product_id, qty],
        )
        .unwrap();
}

/// 写入配送伙伴
///
/// 注意: PartnerRepository::list 按 name 排序，测试中用名称前缀
/// 控制 first-fit 的车辆扫描顺序。
pub fn seed_partner(
    conn: &Arc<Mutex<Connection>>,
    id: &str,
    name: &str,
    vehicle_type: Option<&str>,
    max_capacity_kg: f64,
) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO delivery_partners (id, name, vehicle_type, max_capacity_kg) VALUES (?1, ?2, ?3, ?4)",
            params![id, name, vehicle_type, max_capacity_kg],
        )
        .unwrap();
}

/// 写入待派订单（坐标可选）
///
/// 待派查询按 created_at, id 排序；测试用递增的订单 ID
/// 保证先到先服务顺序确定。
pub fn seed_order(
    conn: &Arc<Mutex<Connection>>,
    id: &str,
    location: Option<(f64, f64)>,
    items: &[(&str, i64)],
) {
    let location_json =
        location.map(|(lat, lng)| json!({"type": "Point", "coordinates": [lng, lat]}).to_string());
    let guard = conn.lock().unwrap();
    guard
        .execute(
            r#"
            INSERT INTO customer_orders (id, customer_name, delivery_address, delivery_location, status)
            VALUES (?1, ?2, 'N/A', ?3, 'Pending')
            "#,
            params![id, format!("客户-{}", id), location_json],
        )
        .unwrap();
    for (index, (product_id, qty)) in items.iter().enumerate() {
        guard
            .execute(
                "INSERT INTO order_items (id, order_id, product_id, quantity) VALUES (?1, ?2, ?3, ?4)",
                params![format!("{}-item-{}", id, index), id, product_id, qty],
            )
            .unwrap();
    }
}

// ==========================================
// MockSolver - 求解器测试替身
// ==========================================

/// 脚本化求解器: 按请求中的 service 顺序原样返回访问顺序，
/// 指定车辆 ID 则返回未求解
pub struct MockSolver {
    /// 这些车辆的请求返回 NoSolution
    pub fail_vehicles: HashSet<String>,
    /// 累计 solve 调用次数
    pub calls: AtomicUsize,
}

impl MockSolver {
    pub fn new() -> Self {
        Self {
            fail_vehicles: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(vehicle_ids: &[&str]) -> Self {
        Self {
            fail_vehicles: vehicle_ids.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 足够多坐标点的路线几何（可触发交通叠加层生成）
    fn geometry() -> serde_json::Value {
        let coords: Vec<_> = (0..12)
            .map(|i| json!([121.4 + 0.01 * i as f64, 31.2 + 0.01 * i as f64]))
            .collect();
        json!([{ "coordinates": coords }])
    }
}

#[async_trait]
impl RouteSolver for MockSolver {
    async fn solve(&self, request: &SolverRequest) -> SolverResult<SolvedRoute> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_vehicles.contains(&request.vehicle.id) {
            return Err(SolverError::NoSolution("mock: 需求不可行".to_string()));
        }

        let mut activities = vec![SolvedActivity {
            activity_type: ActivityType::Start,
            stop_id: None,
        }];
        for service in &request.services {
            activities.push(SolvedActivity {
                activity_type: ActivityType::Service,
                stop_id: Some(service.id.clone()),
            });
        }
        activities.push(SolvedActivity {
            activity_type: ActivityType::End,
            stop_id: None,
        });

        Ok(SolvedRoute {
            activities,
            distance_meters: 12_000.0,
            duration_seconds: 1_800.0,
            geometry: Self::geometry(),
        })
    }
}
