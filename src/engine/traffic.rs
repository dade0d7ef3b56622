// ==========================================
// 仓储物流调度系统 - 模拟交通叠加层
// ==========================================
// 职责: 从路线几何中随机抽取若干段标记为拥堵，
// 作为地图展示的演示性叠加层（非真实路况数据）
// ==========================================

use rand::Rng;
use serde_json::Value;

/// 抽取的拥堵段数量
const SEGMENT_COUNT: usize = 2;
/// 每段包含的坐标点数
const SEGMENT_LEN: usize = 5;

/// 从路线几何生成模拟拥堵段
///
/// 几何格式: 求解器返回的分段数组，每段含 coordinates 坐标列表。
/// 把全部坐标摊平后随机取 SEGMENT_COUNT 个连续片段；
/// 坐标总数不足 10 个时不生成。
///
/// # 返回
/// - Some(Value): 拥堵段数组（坐标片段的列表）
/// - None: 几何为空或点数不足
pub fn simulate_traffic(geometry: &Value) -> Option<Value> {
    let segments = geometry.as_array()?;
    if segments.is_empty() {
        return None;
    }

    let coordinates: Vec<&Value> = segments
        .iter()
        .filter_map(|seg| seg.get("coordinates").and_then(|c| c.as_array()))
        .flatten()
        .collect();

    let mut rng = rand::thread_rng();
    let mut traffic_segments = Vec::new();
    for _ in 0..SEGMENT_COUNT {
        if coordinates.len() < 10 {
            continue;
        }
        let start = rng.gen_range(0..coordinates.len() - SEGMENT_LEN);
        let segment: Vec<Value> = coordinates[start..start + SEGMENT_LEN]
            .iter()
            .map(|v| (*v).clone())
            .collect();
        traffic_segments.push(Value::Array(segment));
    }

    if traffic_segments.is_empty() {
        None
    } else {
        Some(Value::Array(traffic_segments))
    }
}
