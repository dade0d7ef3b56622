// ==========================================
// 仓储物流调度系统 - 引擎层
// ==========================================
// 职责: 实现调度管线的业务规则引擎,不拼 SQL
// 红线: 过滤/装箱引擎保持纯函数语义与确定性
// ==========================================

pub mod fulfillability;
pub mod orchestrator;
pub mod packer;
pub mod reconciler;
pub mod request_builder;
pub mod traffic;

// 重导出核心引擎
pub use fulfillability::FulfillabilityFilter;
pub use orchestrator::{DispatchOrchestrator, DispatchRunResult};
pub use packer::{CapacityPacker, PackResult};
pub use reconciler::{PlanReconciler, ReconcileReport};
pub use request_builder::{RouteRequestBuilder, DEFAULT_VEHICLE_TYPE};
