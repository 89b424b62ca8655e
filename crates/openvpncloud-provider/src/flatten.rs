//! Conversions between API models and attribute values

use openvpncloud_client::{Connector, CustomServiceType, Device, Route, ServiceConfig};
use openvpncloud_plugin::{Block, Fields};
use serde_json::{Value, json};

/// List value, or null when the API reports no items
pub fn non_empty<T: Into<Value>>(items: Vec<T>) -> Value {
    if items.is_empty() {
        Value::Null
    } else {
        items.into()
    }
}

pub fn connector_to_value(connector: &Connector) -> Value {
    json!({
        "id": connector.id,
        "name": connector.name,
        "description": connector.description,
        "vpn_region_id": connector.vpn_region_id,
        "network_item_id": connector.network_item_id,
        "network_item_type": connector.network_item_type,
        "ip_v4_address": connector.ip_v4_address,
        "ip_v6_address": connector.ip_v6_address,
    })
}

/// Connector to create from a configured block
pub fn connector_from_block(block: &Block<'_>, network_item_type: &str) -> Connector {
    Connector {
        name: block.get_str("name").to_string(),
        description: block.get_str("description").to_string(),
        vpn_region_id: block.get_str("vpn_region_id").to_string(),
        network_item_type: network_item_type.to_string(),
        ..Default::default()
    }
}

pub fn route_to_value(route: &Route) -> Value {
    json!({
        "id": route.id,
        "type": route.route_type,
        "value": route.value(),
        "description": route.description,
    })
}

pub fn route_from_block(block: &Block<'_>) -> Route {
    Route::new(block.get_str("type"), block.get_str("value"))
        .with_description(block.get_str("description"))
}

pub fn device_to_value(device: &Device) -> Value {
    json!({
        "id": device.id,
        "name": device.name,
        "description": device.description,
        "ipv4_address": device.ip_v4_address,
        "ipv6_address": device.ip_v6_address,
    })
}

pub fn device_from_block(block: &Block<'_>) -> Device {
    Device {
        name: block.get_str("name").to_string(),
        description: block.get_str("description").to_string(),
        ip_v4_address: block.get_str("ipv4_address").to_string(),
        ip_v6_address: block.get_str("ipv6_address").to_string(),
        ..Default::default()
    }
}

pub fn service_config_to_value(config: &ServiceConfig) -> Value {
    let custom: Vec<Value> = config
        .custom_service_types
        .iter()
        .map(|c| {
            json!({
                "protocol": c.protocol,
                "from_port": c.from_port,
                "to_port": c.to_port,
            })
        })
        .collect();

    json!({
        "service_types": config.service_types,
        "custom_service_types": custom,
    })
}

pub fn service_config_from_block(block: &Block<'_>) -> ServiceConfig {
    ServiceConfig {
        service_types: block.get_string_list("service_types"),
        custom_service_types: block
            .get_blocks("custom_service_types")
            .iter()
            .map(|c| CustomServiceType {
                protocol: c.get_str("protocol").to_string(),
                from_port: c.get_i64("from_port"),
                to_port: c.get_i64("to_port"),
            })
            .collect(),
    }
}
