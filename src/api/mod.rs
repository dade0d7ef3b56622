// ==========================================
// 仓储物流调度系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI/HTTP 入口调用
// ==========================================

pub mod dispatch_api;
pub mod error;
pub mod inbound_api;

// 重导出核心类型
pub use dispatch_api::{DispatchApi, DispatchOutcome};
pub use error::{ApiError, ApiResult};
pub use inbound_api::InboundApi;
