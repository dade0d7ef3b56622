// ==========================================
// 仓储物流调度系统 - GraphHopper VRP 求解器集成
// ==========================================
// 实现 RouteSolver：把语义请求映射为 GraphHopper VRP
// wire 格式，POST 后解析 solution 或报告未求解
// ==========================================

use crate::solver::types::{
    ActivityType, SolvedActivity, SolvedRoute, SolverRequest,
};
use crate::solver::{RouteSolver, SolverError, SolverResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// 求解器配置（显式传入，禁止环境变量等环境全局态）
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// VRP 端点，例如 https://graphhopper.com/api/1/vrp
    pub api_url: String,
    pub api_key: String,
    /// 路由 profile（默认 "car"）
    pub profile: String,
    /// 单次求解调用超时（秒）
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            api_url: "https://graphhopper.com/api/1/vrp".to_string(),
            api_key: String::new(),
            profile: "car".to_string(),
            timeout_secs: 30,
        }
    }
}

// ==========================================
// GraphHopper wire 格式（请求）
// ==========================================

#[derive(Debug, Serialize)]
struct GhAddress {
    location_id: String,
    lon: f64,
    lat: f64,
}

#[derive(Debug, Serialize)]
struct GhVehicle {
    vehicle_id: String,
    type_id: String,
    start_address: GhAddress,
    end_address: GhAddress,
    return_to_depot: bool,
}

#[derive(Debug, Serialize)]
struct GhVehicleType {
    type_id: String,
    profile: String,
    capacity: Vec<i64>,
}

#[derive(Debug, Serialize)]
struct GhService {
    id: String,
    address: GhAddress,
    size: Vec<i64>,
}

#[derive(Debug, Serialize)]
struct GhRequest {
    vehicles: Vec<GhVehicle>,
    vehicle_types: Vec<GhVehicleType>,
    services: Vec<GhService>,
    configuration: serde_json::Value,
}

// ==========================================
// GraphHopper wire 格式（响应）
// ==========================================

#[derive(Debug, Deserialize)]
struct GhActivity {
    #[serde(rename = "type")]
    activity_type: String,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GhRoute {
    #[serde(default)]
    activities: Vec<GhActivity>,
    #[serde(default)]
    points: serde_json::Value,
    #[serde(default)]
    completion_time: f64,
    #[serde(default)]
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct GhSolution {
    routes: Vec<GhRoute>,
}

// ==========================================
// GraphHopperSolver
// ==========================================

/// GraphHopper VRP 求解器客户端
pub struct GraphHopperSolver {
    client: reqwest::Client,
    config: SolverConfig,
}

impl GraphHopperSolver {
    /// 创建求解器客户端
    pub fn new(config: SolverConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// 语义请求 -> GraphHopper wire 请求
    ///
    /// 容量与需求量均已由请求构建器整数化（floor），此处只做透传。
    fn build_wire_request(&self, request: &SolverRequest) -> GhRequest {
        let type_id = format!("{}_type", request.vehicle.type_label);
        let depot = GhAddress {
            location_id: "warehouse".to_string(),
            lon: request.vehicle.depot.lng,
            lat: request.vehicle.depot.lat,
        };

        GhRequest {
            vehicles: vec![GhVehicle {
                vehicle_id: request.vehicle.id.clone(),
                type_id: type_id.clone(),
                start_address: GhAddress {
                    location_id: depot.location_id.clone(),
                    lon: depot.lon,
                    lat: depot.lat,
                },
                end_address: depot,
                return_to_depot: true,
            }],
            vehicle_types: vec![GhVehicleType {
                type_id,
                profile: self.config.profile.clone(),
                capacity: vec![request.vehicle.capacity],
            }],
            services: request
                .services
                .iter()
                .map(|s| GhService {
                    id: s.id.clone(),
                    address: GhAddress {
                        location_id: s.id.clone(),
                        lon: s.location.lng,
                        lat: s.location.lat,
                    },
                    size: vec![s.size],
                })
                .collect(),
            configuration: serde_json::json!({ "routing": { "calc_points": true } }),
        }
    }
}

#[async_trait]
impl RouteSolver for GraphHopperSolver {
    async fn solve(&self, request: &SolverRequest) -> SolverResult<SolvedRoute> {
        let wire = self.build_wire_request(request);
        debug!(
            vehicle_id = %request.vehicle.id,
            services = request.services.len(),
            "发送求解请求"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .query(&[("key", self.config.api_key.as_str())])
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&wire)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SolverError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    SolverError::Transport(e.to_string())
                }
            })?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SolverError::InvalidResponse(e.to_string()))?;

        // 无 solution 字段 = 未求解（请求不合法 / 需求不可行 / 服务端错误）
        let solution_value = match payload.get("solution") {
            Some(v) if !v.is_null() => v.clone(),
            _ => {
                warn!(vehicle_id = %request.vehicle.id, "求解服务未返回 solution");
                return Err(SolverError::NoSolution(payload.to_string()));
            }
        };

        let solution: GhSolution = serde_json::from_value(solution_value)
            .map_err(|e| SolverError::InvalidResponse(e.to_string()))?;

        let route = solution
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| SolverError::NoSolution("solution.routes 为空".to_string()))?;

        Ok(SolvedRoute {
            activities: route
                .activities
                .into_iter()
                .map(|a| SolvedActivity {
                    activity_type: match a.activity_type.as_str() {
                        "start" => ActivityType::Start,
                        "service" => ActivityType::Service,
                        "end" => ActivityType::End,
                        _ => ActivityType::Other,
                    },
                    stop_id: a.id,
                })
                .collect(),
            distance_meters: route.distance,
            duration_seconds: route.completion_time,
            geometry: route.points,
        })
    }
}
