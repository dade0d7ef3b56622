// ==========================================
// 仓储物流调度系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod inbound_repo;
pub mod order_repo;
pub mod partner_repo;
pub mod product_repo;
pub mod route_repo;
pub mod stock_repo;
pub mod warehouse_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use inbound_repo::InboundRepository;
pub use order_repo::OrderRepository;
pub use partner_repo::PartnerRepository;
pub use product_repo::ProductRepository;
pub use route_repo::{NewRoute, RouteRepository};
pub use stock_repo::StockRepository;
pub use warehouse_repo::WarehouseRepository;
