// ==========================================
// 仓储物流调度系统 - 外部求解器边界
// ==========================================
// 职责: 定义单车路径求解的抽象接口（单方法），
// 任何具体求解器集成/测试替身只需实现 solve 一个方法
// ==========================================

pub mod graphhopper;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use graphhopper::{GraphHopperSolver, SolverConfig};
pub use types::{
    ActivityType, SolvedActivity, SolvedRoute, SolverRequest, SolverService, SolverVehicle,
};

/// 求解器边界错误类型
///
/// 对调度管线而言，任何变体都意味着「本车未求解」：
/// 记日志、跳过该车辆装载、继续处理其余装载。
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("求解服务请求失败: {0}")]
    Transport(String),

    #[error("求解服务调用超时（{timeout_secs}s）")]
    Timeout { timeout_secs: u64 },

    #[error("求解服务未返回可行解: {0}")]
    NoSolution(String),

    #[error("求解响应解析失败: {0}")]
    InvalidResponse(String),
}

/// Result 类型别名
pub type SolverResult<T> = Result<T, SolverError>;

// ==========================================
// RouteSolver - 求解器抽象
// ==========================================

/// 单车路径求解器
///
/// 一次 solve = 一辆车 + 其全部停靠需求，返回求解成功的路线或失败。
/// 调用方必须对每次调用施加超时上限，超时视同未求解。
#[async_trait]
pub trait RouteSolver: Send + Sync {
    async fn solve(&self, request: &SolverRequest) -> SolverResult<SolvedRoute>;
}
