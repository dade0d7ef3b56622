// ==========================================
// 仓储物流调度系统 - 求解请求构建引擎
// ==========================================
// 职责: 把一个非空车辆装载翻译为求解器无关的单车请求
// ==========================================

use crate::domain::route::VehicleLoad;
use crate::domain::types::GeoPoint;
use crate::solver::types::{SolverRequest, SolverService, SolverVehicle};

/// 伙伴未声明车型时使用的默认车型标签
pub const DEFAULT_VEHICLE_TYPE: &str = "truck";

// ==========================================
// RouteRequestBuilder - 求解请求构建引擎
// ==========================================
pub struct RouteRequestBuilder {
    // 无状态引擎，不需要注入依赖
}

impl Default for RouteRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteRequestBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// 构建单车求解请求
    ///
    /// 车辆: 伙伴 ID + 车型标签（缺省 "truck"）+ 仓库往返起终点，
    /// 载重取 floor(max_capacity_kg)。
    /// 停靠: 每个订单一个 service，需求量取 floor(weight_kg)。
    ///
    /// 求解协议要求整数单位，双侧一致向下取整。分数余量导致的
    /// 可行解被报不可行是已接受的近似，禁止改成四舍五入“修复”。
    ///
    /// # 参数
    /// - warehouse_location: 仓库坐标（发车原点）
    /// - load: 车辆装载
    ///
    /// # 返回
    /// - Some(SolverRequest): 非空装载的请求
    /// - None: 空载车辆，直接跳过，不发起求解
    pub fn build(
        &self,
        warehouse_location: &GeoPoint,
        load: &VehicleLoad,
    ) -> Option<SolverRequest> {
        if load.is_empty() {
            return None;
        }

        let type_label = load
            .partner
            .vehicle_type
            .clone()
            .unwrap_or_else(|| DEFAULT_VEHICLE_TYPE.to_string());

        Some(SolverRequest {
            vehicle: SolverVehicle {
                id: load.partner.id.clone(),
                type_label,
                capacity: load.partner.max_capacity_kg.floor() as i64,
                depot: *warehouse_location,
            },
            services: load
                .orders
                .iter()
                .map(|o| SolverService {
                    id: o.order.id.clone(),
                    location: o.location,
                    size: o.weight_kg.floor() as i64,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{CustomerOrder, FulfillableOrder};
    use crate::domain::partner::DeliveryPartner;
    use crate::domain::types::OrderStatus;
    use chrono::Utc;

    fn partner(vehicle_type: Option<&str>, capacity: f64) -> DeliveryPartner {
        DeliveryPartner {
            id: "p1".to_string(),
            name: "測試車隊".to_string(),
            vehicle_type: vehicle_type.map(|s| s.to_string()),
            max_capacity_kg: capacity,
        }
    }

    fn fulfillable(order_id: &str, weight_kg: f64) -> FulfillableOrder {
        FulfillableOrder {
            order: CustomerOrder {
                id: order_id.to_string(),
                customer_name: "客户A".to_string(),
                delivery_address: "N/A".to_string(),
                status: OrderStatus::Pending,
                created_at: Utc::now(),
                delivery_location: Some(GeoPoint { lat: 31.3, lng: 121.5 }),
                items: vec![],
            },
            location: GeoPoint { lat: 31.3, lng: 121.5 },
            weight_kg,
        }
    }

    #[test]
    fn test_empty_load_skipped() {
        let builder = RouteRequestBuilder::new();
        let load = VehicleLoad::new(partner(None, 100.0));
        let wh = GeoPoint { lat: 31.2, lng: 121.4 };
        assert!(builder.build(&wh, &load).is_none());
    }

    #[test]
    fn test_floor_truncation_and_default_type() {
        let builder = RouteRequestBuilder::new();
        let mut load = VehicleLoad::new(partner(None, 99.9));
        load.assign(fulfillable("o1", 40.7));
        let wh = GeoPoint { lat: 31.2, lng: 121.4 };

        let req = builder.build(&wh, &load).unwrap();
        // 双侧一致向下取整
        assert_eq!(req.vehicle.capacity, 99);
        assert_eq!(req.services[0].size, 40);
        assert_eq!(req.vehicle.type_label, DEFAULT_VEHICLE_TYPE);
        assert_eq!(req.vehicle.depot.lat, 31.2);
    }

    #[test]
    fn test_vehicle_type_label_passthrough() {
        let builder = RouteRequestBuilder::new();
        let mut load = VehicleLoad::new(partner(Some("van"), 100.0));
        load.assign(fulfillable("o1", 10.0));
        let wh = GeoPoint { lat: 31.2, lng: 121.4 };

        let req = builder.build(&wh, &load).unwrap();
        assert_eq!(req.vehicle.type_label, "van");
        assert_eq!(req.services.len(), 1);
        assert_eq!(req.services[0].id, "o1");
    }
}
