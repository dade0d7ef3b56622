// ==========================================
// 仓储物流调度系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 求解器凭证/端点作为显式配置传入客户端构造函数，
// 不走环境全局态
// ==========================================

use crate::solver::SolverConfig;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键: 求解器 VRP 端点
pub const KEY_SOLVER_API_URL: &str = "solver_api_url";
/// 配置键: 求解器 API key
pub const KEY_SOLVER_API_KEY: &str = "solver_api_key";
/// 配置键: 路由 profile
pub const KEY_SOLVER_PROFILE: &str = "solver_profile";
/// 配置键: 单次求解调用超时（秒）
pub const KEY_SOLVER_TIMEOUT_SECS: &str = "solver_timeout_secs";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT (scope_id, key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 组装求解器配置（缺失键使用默认值）
    pub fn solver_config(&self) -> Result<SolverConfig, Box<dyn Error>> {
        let defaults = SolverConfig::default();

        let api_url = self
            .get_config_value(KEY_SOLVER_API_URL)?
            .unwrap_or(defaults.api_url);
        let api_key = self
            .get_config_value(KEY_SOLVER_API_KEY)?
            .unwrap_or(defaults.api_key);
        let profile = self
            .get_config_value(KEY_SOLVER_PROFILE)?
            .unwrap_or(defaults.profile);
        let timeout_secs = self
            .get_config_value(KEY_SOLVER_TIMEOUT_SECS)?
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_secs);

        Ok(SolverConfig {
            api_url,
            api_key,
            profile,
            timeout_secs,
        })
    }
}
