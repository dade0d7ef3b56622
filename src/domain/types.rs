// ==========================================
// 仓储物流调度系统 - 领域类型定义
// ==========================================
// 坐标、订单状态、入库单状态等基础类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 地理坐标 (GeoPoint)
// ==========================================

/// 经纬度坐标
///
/// 存储层使用 GeoJSON Point（coordinates = [lng, lat]），
/// 领域层统一使用本类型，避免经纬度顺序混淆。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// 解析 GeoJSON Point
///
/// # 参数
/// - value: GeoJSON 值（期望 {"type":"Point","coordinates":[lng,lat]}）
///
/// # 返回
/// - Some(GeoPoint): 解析成功
/// - None: 空值或格式不合法（缺 coordinates、长度不足、非数值）
pub fn parse_geojson_point(value: &serde_json::Value) -> Option<GeoPoint> {
    let coords = value.get("coordinates")?.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    let lng = coords[0].as_f64()?;
    let lat = coords[1].as_f64()?;
    Some(GeoPoint { lat, lng })
}

/// 生成 GeoJSON Point 值（写库时使用）
pub fn to_geojson_point(point: &GeoPoint) -> serde_json::Value {
    serde_json::json!({
        "type": "Point",
        "coordinates": [point.lng, point.lat],
    })
}

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 数据库存储显示文本（与前端展示一致）:
// "Pending" / "Out for Delivery" / "Delivered"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// 数据库/展示文本
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// 从数据库文本解析（未知文本返回 None）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OrderStatus::Pending),
            "Out for Delivery" => Some(OrderStatus::OutForDelivery),
            "Delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 入库单状态 (Shipment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    InTransit,
    Received,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Received => "Received",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "In Transit" => Some(ShipmentStatus::InTransit),
            "Received" => Some(ShipmentStatus::Received),
            _ => None,
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_geojson_point() {
        let v = json!({"type": "Point", "coordinates": [121.47, 31.23]});
        let p = parse_geojson_point(&v).unwrap();
        assert_eq!(p.lat, 31.23);
        assert_eq!(p.lng, 121.47);
    }

    #[test]
    fn test_parse_geojson_point_invalid() {
        assert!(parse_geojson_point(&json!(null)).is_none());
        assert!(parse_geojson_point(&json!({"type": "Point"})).is_none());
        assert!(parse_geojson_point(&json!({"coordinates": [1.0]})).is_none());
        assert!(parse_geojson_point(&json!({"coordinates": ["a", "b"]})).is_none());
    }

    #[test]
    fn test_order_status_roundtrip() {
        assert_eq!(OrderStatus::parse("Out for Delivery"), Some(OrderStatus::OutForDelivery));
        assert_eq!(OrderStatus::OutForDelivery.as_str(), "Out for Delivery");
        assert_eq!(OrderStatus::parse("???"), None);
    }
}
