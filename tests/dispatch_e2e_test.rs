// ==========================================
// 派车规划端到端测试
// ==========================================
// 测试目标: 完整管线（过滤 -> 装箱 -> 求解 -> 回写）
// 求解器使用脚本化测试替身，数据库为临时 SQLite
// ==========================================

mod test_helpers;

use std::sync::{Arc, Mutex};
use test_helpers::*;
use warehouse_dispatch::api::{ApiError, DispatchApi, DispatchOutcome};
use warehouse_dispatch::domain::types::OrderStatus;
use warehouse_dispatch::engine::{DispatchOrchestrator, PlanReconciler};
use warehouse_dispatch::repository::{
    OrderRepository, PartnerRepository, ProductRepository, RouteRepository, StockRepository,
    WarehouseRepository,
};
use warehouse_dispatch::solver::RouteSolver;

// ==========================================
// 测试辅助函数
// ==========================================

fn build_api(
    conn: &Arc<Mutex<rusqlite::Connection>>,
    solver: Arc<dyn RouteSolver>,
) -> DispatchApi {
    let order_repo = Arc::new(OrderRepository::from_connection(conn.clone()));
    let stock_repo = Arc::new(StockRepository::from_connection(conn.clone()));
    let route_repo = Arc::new(RouteRepository::from_connection(conn.clone()));
    let reconciler = PlanReconciler::new(order_repo.clone(), stock_repo.clone(), route_repo);
    DispatchApi::new(
        Arc::new(WarehouseRepository::from_connection(conn.clone())),
        order_repo,
        stock_repo,
        Arc::new(ProductRepository::from_connection(conn.clone())),
        Arc::new(PartnerRepository::from_connection(conn.clone())),
        DispatchOrchestrator::new(solver, reconciler),
    )
}

fn order_status(conn: &Arc<Mutex<rusqlite::Connection>>, order_id: &str) -> OrderStatus {
    let repo = OrderRepository::from_connection(conn.clone());
    repo.find_by_id(order_id).unwrap().status
}

fn stock_qty(conn: &Arc<Mutex<rusqlite::Connection>>, warehouse_id: &str, product_id: &str) -> i64 {
    StockRepository::from_connection(conn.clone())
        .get_quantity(warehouse_id, product_id)
        .unwrap()
        .unwrap_or(0)
}

// ==========================================
// 场景 A: 单车单单成功
// ==========================================

#[tokio::test]
async fn test_scenario_a_single_order_dispatched() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse(&conn, "w1", 31.23, 121.47);
    seed_product(&conn, "p1", 20.0);
    seed_stock(&conn, "w1", "p1", 5);
    seed_partner(&conn, "v1", "A-车队", Some("van"), 100.0);
    // 订单重量 2 × 20 = 40
    seed_order(&conn, "o1", Some((31.30, 121.50)), &[("p1", 2)]);

    let mock = Arc::new(MockSolver::new());
    let api = build_api(&conn, mock.clone());

    let outcome = api.plan_routes("w1").await.unwrap();
    match outcome {
        DispatchOutcome::RoutesPlanned {
            routes_created,
            unassigned_order_ids,
        } => {
            assert_eq!(routes_created, 1);
            assert!(unassigned_order_ids.is_empty());
        }
        other => panic!("期望 RoutesPlanned，实际 {:?}", other),
    }

    assert_eq!(mock.call_count(), 1);
    assert_eq!(order_status(&conn, "o1"), OrderStatus::OutForDelivery);
    // 库存扣减: 5 - 2 = 3
    assert_eq!(stock_qty(&conn, "w1", "p1"), 3);

    // 恰好一个停靠点，编号 1
    let route_repo = RouteRepository::from_connection(conn.clone());
    let stops = route_repo.find_stops_by_order("o1").unwrap();
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].stop_number, 1);

    let routes = route_repo.list_routes().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].delivery_partner_id, "v1");
    assert_eq!(routes[0].warehouse_id, "w1");
    // 几何原样落库
    assert!(routes[0].route_geometry.is_array());
}

// ==========================================
// 场景 B: first-fit 装不下放弃
// ==========================================

#[tokio::test]
async fn test_scenario_b_misfit_order_stays_pending() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse(&conn, "w1", 31.23, 121.47);
    seed_product(&conn, "p1", 60.0);
    seed_product(&conn, "p2", 50.0);
    seed_stock(&conn, "w1", "p1", 10);
    seed_stock(&conn, "w1", "p2", 10);
    seed_partner(&conn, "v1", "A-车队", None, 100.0);
    seed_order(&conn, "o1", Some((31.30, 121.50)), &[("p1", 1)]);
    seed_order(&conn, "o2", Some((31.31, 121.51)), &[("p2", 1)]);

    let mock = Arc::new(MockSolver::new());
    let api = build_api(&conn, mock.clone());

    let outcome = api.plan_routes("w1").await.unwrap();
    match outcome {
        DispatchOutcome::RoutesPlanned {
            routes_created,
            unassigned_order_ids,
        } => {
            assert_eq!(routes_created, 1);
            assert_eq!(unassigned_order_ids, vec!["o2".to_string()]);
        }
        other => panic!("期望 RoutesPlanned，实际 {:?}", other),
    }

    assert_eq!(order_status(&conn, "o1"), OrderStatus::OutForDelivery);
    // o2 留待下轮: 状态不变，库存不动
    assert_eq!(order_status(&conn, "o2"), OrderStatus::Pending);
    assert_eq!(stock_qty(&conn, "w1", "p2"), 10);
}

// ==========================================
// 场景 C: 库存不足在装箱前排除
// ==========================================

#[tokio::test]
async fn test_scenario_c_stock_short_order_excluded() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse(&conn, "w1", 31.23, 121.47);
    seed_product(&conn, "p1", 10.0);
    seed_stock(&conn, "w1", "p1", 1);
    seed_partner(&conn, "v1", "A-车队", None, 100.0);
    seed_order(&conn, "o1", Some((31.30, 121.50)), &[("p1", 3)]);

    let mock = Arc::new(MockSolver::new());
    let api = build_api(&conn, mock.clone());

    let outcome = api.plan_routes("w1").await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::NoFulfillableOrders));

    // 未触达求解器，零路线引用该订单
    assert_eq!(mock.call_count(), 0);
    assert_eq!(order_status(&conn, "o1"), OrderStatus::Pending);
    assert!(RouteRepository::from_connection(conn.clone())
        .list_routes()
        .unwrap()
        .is_empty());
}

// ==========================================
// 场景 D: 单车求解失败不影响其余车辆
// ==========================================

#[tokio::test]
async fn test_scenario_d_solver_failure_isolated_per_load() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse(&conn, "w1", 31.23, 121.47);
    seed_product(&conn, "p1", 40.0);
    seed_stock(&conn, "w1", "p1", 10);
    // 两辆 50 容量车: o1 -> v1, o2 -> v2
    seed_partner(&conn, "v1", "A-车队", None, 50.0);
    seed_partner(&conn, "v2", "B-车队", None, 50.0);
    seed_order(&conn, "o1", Some((31.30, 121.50)), &[("p1", 1)]);
    seed_order(&conn, "o2", Some((31.31, 121.51)), &[("p1", 1)]);

    let mock = Arc::new(MockSolver::failing_for(&["v1"]));
    let api = build_api(&conn, mock.clone());

    let outcome = api.plan_routes("w1").await.unwrap();
    match outcome {
        DispatchOutcome::RoutesPlanned { routes_created, .. } => assert_eq!(routes_created, 1),
        other => panic!("期望 RoutesPlanned，实际 {:?}", other),
    }
    assert_eq!(mock.call_count(), 2);

    // v1 失败: o1 保持 Pending，库存不扣
    assert_eq!(order_status(&conn, "o1"), OrderStatus::Pending);
    // v2 成功: o2 派出，库存扣 1
    assert_eq!(order_status(&conn, "o2"), OrderStatus::OutForDelivery);
    assert_eq!(stock_qty(&conn, "w1", "p1"), 9);

    let route_repo = RouteRepository::from_connection(conn.clone());
    assert!(route_repo.find_stops_by_order("o1").unwrap().is_empty());
    assert_eq!(route_repo.find_stops_by_order("o2").unwrap().len(), 1);
}

// ==========================================
// 场景 E: 无待派订单
// ==========================================

#[tokio::test]
async fn test_scenario_e_no_pending_orders() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse(&conn, "w1", 31.23, 121.47);
    seed_partner(&conn, "v1", "A-车队", None, 100.0);

    let mock = Arc::new(MockSolver::new());
    let api = build_api(&conn, mock.clone());

    let outcome = api.plan_routes("w1").await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::NoPendingOrders));
    assert_eq!(mock.call_count(), 0);
}

// ==========================================
// 整轮失败与输入错误
// ==========================================

#[tokio::test]
async fn test_all_loads_failing_is_run_level_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse(&conn, "w1", 31.23, 121.47);
    seed_product(&conn, "p1", 10.0);
    seed_stock(&conn, "w1", "p1", 5);
    seed_partner(&conn, "v1", "A-车队", None, 100.0);
    seed_order(&conn, "o1", Some((31.30, 121.50)), &[("p1", 1)]);

    let mock = Arc::new(MockSolver::failing_for(&["v1"]));
    let api = build_api(&conn, mock.clone());

    let err = api.plan_routes("w1").await.unwrap_err();
    assert!(matches!(err, ApiError::RoutingFailed { attempted: 1 }));

    // 无任何副作用落库
    assert_eq!(order_status(&conn, "o1"), OrderStatus::Pending);
    assert_eq!(stock_qty(&conn, "w1", "p1"), 5);
}

#[tokio::test]
async fn test_unknown_warehouse_rejected_without_side_effects() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_product(&conn, "p1", 10.0);
    seed_order(&conn, "o1", Some((31.30, 121.50)), &[("p1", 1)]);

    let mock = Arc::new(MockSolver::new());
    let api = build_api(&conn, mock.clone());

    let err = api.plan_routes("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(mock.call_count(), 0);

    let err = api.plan_routes("  ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_warehouse_without_location_rejected() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse_without_location(&conn, "w1");

    let api = build_api(&conn, Arc::new(MockSolver::new()));
    let err = api.plan_routes("w1").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

// ==========================================
// 幂等边界: 已派订单不被重复考虑
// ==========================================

#[tokio::test]
async fn test_rerun_after_success_finds_nothing_to_do() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    seed_warehouse(&conn, "w1", 31.23, 121.47);
    seed_product(&conn, "p1", 20.0);
    seed_stock(&conn, "w1", "p1", 5);
    seed_partner(&conn, "v1", "A-车队", None, 100.0);
    seed_order(&conn, "o1", Some((31.30, 121.50)), &[("p1", 2)]);

    let mock = Arc::new(MockSolver::new());
    let api = build_api(&conn, mock.clone());

    let first = api.plan_routes("w1").await.unwrap();
    assert!(matches!(first, DispatchOutcome::RoutesPlanned { .. }));

    // 重跑: 已派出订单按状态排除，不是错误
    let second = api.plan_routes("w1").await.unwrap();
    assert!(matches!(second, DispatchOutcome::NoPendingOrders));

    // 恰好一次派出: 一个停靠点，库存只扣一次
    let stops = RouteRepository::from_connection(conn.clone())
        .find_stops_by_order("o1")
        .unwrap();
    assert_eq!(stops.len(), 1);
    assert_eq!(stock_qty(&conn, "w1", "p1"), 3);
}
