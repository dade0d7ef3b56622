// ==========================================
// 仓储物流调度系统 - 求解器语义类型
// ==========================================
// 求解器无关的请求/响应形状；具体字段级 wire 格式
// 由各求解器实现自行映射
// ==========================================

use crate::domain::types::GeoPoint;
use serde::{Deserialize, Serialize};

/// 求解请求中的车辆（一次请求恰好一辆）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverVehicle {
    /// 配送伙伴 ID
    pub id: String,
    /// 车型标签（伙伴未声明时使用默认 "truck"）
    pub type_label: String,
    /// 整数化载重（floor(max_capacity_kg)，求解协议要求整数单位）
    pub capacity: i64,
    /// 出发与返回仓库坐标（往返）
    pub depot: GeoPoint,
}

/// 求解请求中的停靠需求（一个订单一个 service）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverService {
    /// 订单 ID
    pub id: String,
    pub location: GeoPoint,
    /// 整数化需求量（floor(weight_kg)）
    pub size: i64,
}

/// 单车求解请求
///
/// 一个非空车辆装载对应一次独立求解调用，不做多车合批。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverRequest {
    pub vehicle: SolverVehicle,
    pub services: Vec<SolverService>,
}

// ==========================================
// 求解结果
// ==========================================

/// 活动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    /// 出发仓库
    Start,
    /// 订单停靠
    Service,
    /// 返回仓库
    End,
    /// 求解器自定义的其他活动
    Other,
}

/// 已求解路线中的一个活动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedActivity {
    pub activity_type: ActivityType,
    /// Service 活动引用的订单 ID；仓库活动为 None
    pub stop_id: Option<String>,
}

/// 单车求解结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedRoute {
    /// 按访问顺序排列的活动列表（含出发/返回仓库）
    pub activities: Vec<SolvedActivity>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// 求解器返回的不透明路线几何，原样落库
    pub geometry: serde_json::Value,
}

impl SolvedRoute {
    /// 按访问顺序提取订单停靠 ID（过滤掉仓库活动）
    pub fn service_order_ids(&self) -> Vec<String> {
        self.activities
            .iter()
            .filter(|a| a.activity_type == ActivityType::Service)
            .filter_map(|a| a.stop_id.clone())
            .collect()
    }
}
