// ==========================================
// CapacityPacker 引擎测试
// ==========================================
// 测试目标: 验证 first-fit 装箱逻辑
// 覆盖范围: 载重上限、确定性、装不下放弃
// ==========================================

use chrono::Utc;
use warehouse_dispatch::domain::order::{CustomerOrder, FulfillableOrder};
use warehouse_dispatch::domain::partner::DeliveryPartner;
use warehouse_dispatch::domain::types::{GeoPoint, OrderStatus};
use warehouse_dispatch::engine::CapacityPacker;

// ==========================================
// 测试辅助函数
// ==========================================

fn partner(id: &str, max_capacity_kg: f64) -> DeliveryPartner {
    DeliveryPartner {
        id: id.to_string(),
        name: format!("车队-{}", id),
        vehicle_type: None,
        max_capacity_kg,
    }
}

fn fulfillable(id: &str, weight_kg: f64) -> FulfillableOrder {
    let location = GeoPoint {
        lat: 31.23,
        lng: 121.47,
    };
    FulfillableOrder {
        order: CustomerOrder {
            id: id.to_string(),
            customer_name: format!("客户-{}", id),
            delivery_address: "N/A".to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            delivery_location: Some(location),
            items: vec![],
        },
        location,
        weight_kg,
    }
}

fn load_order_ids(packer_loads: &warehouse_dispatch::engine::PackResult, index: usize) -> Vec<String> {
    packer_loads.loads[index]
        .orders
        .iter()
        .map(|o| o.order.id.clone())
        .collect()
}

// ==========================================
// first-fit 行为
// ==========================================

#[test]
fn test_first_fit_scans_vehicles_in_order() {
    let packer = CapacityPacker::new();
    let orders = vec![
        fulfillable("o1", 60.0),
        fulfillable("o2", 50.0),
        fulfillable("o3", 30.0),
    ];
    let partners = vec![partner("v1", 100.0), partner("v2", 100.0)];

    let result = packer.pack(orders, partners);
    // o1 -> v1 (剩 40), o2 装不进 v1 -> v2 (剩 50), o3 -> v1
    assert_eq!(load_order_ids(&result, 0), vec!["o1", "o3"]);
    assert_eq!(load_order_ids(&result, 1), vec!["o2"]);
    assert!(result.unassigned.is_empty());
    assert!((result.loads[0].total_weight_kg - 90.0).abs() < 1e-9);
    assert!((result.loads[1].total_weight_kg - 50.0).abs() < 1e-9);
}

#[test]
fn test_no_load_exceeds_capacity() {
    let packer = CapacityPacker::new();
    let orders: Vec<_> = (0..20)
        .map(|i| fulfillable(&format!("o{}", i), 7.0 + (i % 5) as f64 * 11.0))
        .collect();
    let partners = vec![partner("v1", 60.0), partner("v2", 45.0), partner("v3", 30.0)];

    let result = packer.pack(orders, partners);
    for load in &result.loads {
        assert!(
            load.total_weight_kg <= load.partner.max_capacity_kg + 1e-9,
            "车辆 {} 超载: {} > {}",
            load.partner.id,
            load.total_weight_kg,
            load.partner.max_capacity_kg
        );
    }
}

#[test]
fn test_misfit_order_dropped_silently() {
    // 规格场景 B: 100 容量一辆车，60 + 50 两单
    let packer = CapacityPacker::new();
    let orders = vec![fulfillable("o1", 60.0), fulfillable("o2", 50.0)];
    let partners = vec![partner("v1", 100.0)];

    let result = packer.pack(orders, partners);
    assert_eq!(load_order_ids(&result, 0), vec!["o1"]);
    assert!((result.loads[0].total_weight_kg - 60.0).abs() < 1e-9);
    // o2 (50) 装不进剩余 40，放弃本轮
    assert_eq!(result.unassigned.len(), 1);
    assert_eq!(result.unassigned[0].order.id, "o2");
}

#[test]
fn test_order_larger_than_every_vehicle() {
    let packer = CapacityPacker::new();
    let orders = vec![fulfillable("o1", 500.0)];
    let partners = vec![partner("v1", 100.0), partner("v2", 200.0)];

    let result = packer.pack(orders, partners);
    assert!(result.loads.iter().all(|l| l.is_empty()));
    assert_eq!(result.unassigned.len(), 1);
}

#[test]
fn test_deterministic_assignment() {
    let packer = CapacityPacker::new();
    let make_orders = || {
        (0..30)
            .map(|i| fulfillable(&format!("o{}", i), 5.0 + (i % 7) as f64 * 13.0))
            .collect::<Vec<_>>()
    };
    let make_partners =
        || vec![partner("v1", 80.0), partner("v2", 120.0), partner("v3", 40.0)];

    let first = packer.pack(make_orders(), make_partners());
    let second = packer.pack(make_orders(), make_partners());

    for i in 0..first.loads.len() {
        assert_eq!(load_order_ids(&first, i), load_order_ids(&second, i));
    }
    let first_dropped: Vec<_> = first.unassigned.iter().map(|o| o.order.id.clone()).collect();
    let second_dropped: Vec<_> = second.unassigned.iter().map(|o| o.order.id.clone()).collect();
    assert_eq!(first_dropped, second_dropped);
}

#[test]
fn test_no_vehicles_drops_everything() {
    let packer = CapacityPacker::new();
    let orders = vec![fulfillable("o1", 1.0), fulfillable("o2", 2.0)];

    let result = packer.pack(orders, vec![]);
    assert!(result.loads.is_empty());
    assert_eq!(result.unassigned.len(), 2);
}

#[test]
fn test_zero_weight_order_consumes_no_capacity() {
    let packer = CapacityPacker::new();
    let orders = vec![fulfillable("o1", 0.0), fulfillable("o2", 100.0)];
    let partners = vec![partner("v1", 100.0)];

    let result = packer.pack(orders, partners);
    assert_eq!(load_order_ids(&result, 0), vec!["o1", "o2"]);
    assert!((result.loads[0].total_weight_kg - 100.0).abs() < 1e-9);
}
