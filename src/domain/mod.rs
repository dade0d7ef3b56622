// ==========================================
// 仓储物流调度系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod inbound;
pub mod order;
pub mod partner;
pub mod product;
pub mod route;
pub mod types;
pub mod warehouse;

// 重导出核心类型
pub use inbound::InboundShipment;
pub use order::{CustomerOrder, FulfillableOrder, OrderItem};
pub use partner::DeliveryPartner;
pub use product::Product;
pub use route::{DeliveryRoute, RouteStop, VehicleLoad};
pub use types::{parse_geojson_point, to_geojson_point, GeoPoint, OrderStatus, ShipmentStatus};
pub use warehouse::{StockLevel, Warehouse};
