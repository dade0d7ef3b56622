// ==========================================
// 仓储物流调度系统 - 配置层
// ==========================================

pub mod config_manager;

pub use config_manager::{
    ConfigManager, KEY_SOLVER_API_KEY, KEY_SOLVER_API_URL, KEY_SOLVER_PROFILE,
    KEY_SOLVER_TIMEOUT_SECS,
};
