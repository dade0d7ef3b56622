// ==========================================
// 仓储物流调度系统 - CLI 入口
// ==========================================
// 用法:
//   warehouse-dispatch <db_path> <warehouse_id>
//
// 对指定仓库执行一轮出库派车规划，打印路线数 /
// 无事可做消息 / 错误。同步单请求单响应，无进度流。
// ==========================================

use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::warn;
use warehouse_dispatch::api::DispatchApi;
use warehouse_dispatch::config::ConfigManager;
use warehouse_dispatch::db::{
    init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION,
};
use warehouse_dispatch::engine::{DispatchOrchestrator, PlanReconciler};
use warehouse_dispatch::logging;
use warehouse_dispatch::repository::{
    OrderRepository, PartnerRepository, ProductRepository, RouteRepository, StockRepository,
    WarehouseRepository,
};
use warehouse_dispatch::solver::GraphHopperSolver;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = match args.next() {
        Some(p) => p,
        None => {
            eprintln!("用法: warehouse-dispatch <db_path> <warehouse_id>");
            return ExitCode::FAILURE;
        }
    };
    let warehouse_id = match args.next() {
        Some(w) => w,
        None => {
            eprintln!("错误: 缺少 warehouse_id");
            eprintln!("用法: warehouse-dispatch <db_path> <warehouse_id>");
            return ExitCode::FAILURE;
        }
    };

    match run(&db_path, &warehouse_id).await {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(db_path: &str, warehouse_id: &str) -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_sqlite_connection(db_path)?;

    // 首次运行自动建表；旧库版本不符时仅告警（不做自动迁移）
    match read_schema_version(&conn)? {
        None => init_schema(&conn)?,
        Some(v) if v != CURRENT_SCHEMA_VERSION => {
            warn!(
                found = v,
                expected = CURRENT_SCHEMA_VERSION,
                "schema_version 与当前代码不一致"
            );
        }
        Some(_) => {}
    }

    let conn = Arc::new(Mutex::new(conn));

    let warehouse_repo = Arc::new(WarehouseRepository::from_connection(conn.clone()));
    let order_repo = Arc::new(OrderRepository::from_connection(conn.clone()));
    let stock_repo = Arc::new(StockRepository::from_connection(conn.clone()));
    let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
    let partner_repo = Arc::new(PartnerRepository::from_connection(conn.clone()));
    let route_repo = Arc::new(RouteRepository::from_connection(conn.clone()));

    let config = ConfigManager::from_connection(conn.clone())?;
    let solver_config = config.solver_config()?;
    if solver_config.api_key.is_empty() {
        return Err("config_kv 未配置 solver_api_key".into());
    }
    let solver = Arc::new(GraphHopperSolver::new(solver_config));

    let reconciler = PlanReconciler::new(order_repo.clone(), stock_repo.clone(), route_repo);
    let orchestrator = DispatchOrchestrator::new(solver, reconciler);
    let api = DispatchApi::new(
        warehouse_repo,
        order_repo,
        stock_repo,
        product_repo,
        partner_repo,
        orchestrator,
    );

    Ok(api.plan_routes(warehouse_id).await?.to_string())
}
