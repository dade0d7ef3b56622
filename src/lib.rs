// ==========================================
// 仓储物流调度系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + 外部 VRP 求解服务
// 系统定位: 仓储后台 + 出库派车规划管线
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 调度管线
pub mod engine;

// 求解器边界 - 外部 VRP 服务
pub mod solver;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CustomerOrder, DeliveryPartner, DeliveryRoute, FulfillableOrder, GeoPoint, InboundShipment,
    OrderItem, OrderStatus, Product, RouteStop, StockLevel, VehicleLoad, Warehouse,
};

// 引擎
pub use engine::{
    CapacityPacker, DispatchOrchestrator, DispatchRunResult, FulfillabilityFilter, PlanReconciler,
    RouteRequestBuilder,
};

// 求解器边界
pub use solver::{
    GraphHopperSolver, RouteSolver, SolvedRoute, SolverConfig, SolverError, SolverRequest,
};

// API
pub use api::{ApiError, DispatchApi, DispatchOutcome, InboundApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓储物流调度系统";
