mod common;

use common::{TestCloud, object};
use serde_json::json;

fn network_config(connector_name: &str, route: &str) -> serde_json::Map<String, serde_json::Value> {
    object(json!({
        "name": "office",
        "default_connector": [{ "name": connector_name, "vpn_region_id": "eu-central-1" }],
        "default_route": [{ "type": "IP_V4", "value": route }]
    }))
}

#[tokio::test]
async fn test_network_create_applies_defaults_and_reads_back() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();

    assert_eq!(state.id, "net-1");
    assert_eq!(state.attributes["description"], json!("Managed by Terraform"));
    assert_eq!(state.attributes["egress"], json!(true));
    assert_eq!(state.attributes["internet_access"], json!("LOCAL"));
    assert_eq!(state.attributes["system_subnets"], json!(["100.96.0.0/11"]));

    let connector = &state.attributes["default_connector"][0];
    assert_eq!(connector["id"], json!("conn-2"));
    assert_eq!(connector["network_item_id"], json!("net-1"));
    assert_eq!(connector["network_item_type"], json!("NETWORK"));
    assert_eq!(state.attributes["default_route"][0]["id"], json!("route-3"));
    assert_eq!(state.attributes["default_route"][0]["value"], json!("10.10.0.0/16"));
}

#[tokio::test]
async fn test_network_unchanged_config_makes_no_calls() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let config = network_config("office-gw", "10.10.0.0/16");
    let state = configured
        .create("openvpncloud_network", config.clone())
        .await
        .unwrap();
    let same = configured.update(&state, config).await.unwrap();

    assert_eq!(same.updated_at, state.updated_at);
    assert_eq!(cloud.fake.calls(), vec!["create_network net-1"]);
}

#[tokio::test]
async fn test_network_replaces_connector_before_removing_old_one() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();
    let updated = configured
        .update(&state, network_config("office-gw-2", "10.10.0.0/16"))
        .await
        .unwrap();

    assert_eq!(
        cloud.fake.calls(),
        vec!["create_network net-1", "add_connector conn-4", "delete_connector conn-2"]
    );
    assert_eq!(updated.attributes["default_connector"][0]["id"], json!("conn-4"));
    assert_eq!(updated.attributes["default_connector"][0]["name"], json!("office-gw-2"));

    let network = cloud.fake.network("net-1").unwrap();
    assert_eq!(network.connectors.len(), 1);
}

#[tokio::test]
async fn test_network_updates_route_in_place_and_scalars() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();

    let mut config = network_config("office-gw", "10.20.0.0/16");
    config.insert("egress".to_string(), json!(false));
    let updated = configured.update(&state, config).await.unwrap();

    assert_eq!(
        cloud.fake.calls(),
        vec!["create_network net-1", "update_route route-3", "update_network net-1"]
    );
    assert_eq!(updated.attributes["default_route"][0]["id"], json!("route-3"));
    assert_eq!(updated.attributes["default_route"][0]["value"], json!("10.20.0.0/16"));
    assert_eq!(updated.attributes["egress"], json!(false));
}

#[tokio::test]
async fn test_vanished_network_is_dropped_on_read() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();
    cloud.fake.forget_network("net-1");

    assert!(configured.read(&state).await.unwrap().is_none());
}

#[tokio::test]
async fn test_network_delete_and_import() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();

    let imported = configured.import("openvpncloud_network", "net-1").await.unwrap();
    assert_eq!(imported.attributes["name"], json!("office"));
    assert_eq!(imported.attributes["default_connector"][0]["id"], json!("conn-2"));

    configured.delete(&state).await.unwrap();
    assert!(cloud.fake.network("net-1").is_none());
}

#[tokio::test]
async fn test_connector_is_replace_only() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();

    let config = object(json!({
        "name": "backup-gw",
        "vpn_region_id": "eu-central-1",
        "network_item_type": "NETWORK",
        "network_item_id": "net-1"
    }));
    let state = configured
        .create("openvpncloud_connector", config.clone())
        .await
        .unwrap();
    assert_eq!(state.id, "conn-4");
    assert!(state.attributes["profile"].as_str().unwrap().contains("conn-4"));
    assert_eq!(state.attributes["ip_v4_address"], json!("100.96.1.4"));

    let same = configured.update(&state, config.clone()).await.unwrap();
    assert_eq!(same.updated_at, state.updated_at);

    let mut moved = config;
    moved.insert("vpn_region_id".to_string(), json!("us-west-1"));
    let diags = configured.update(&state, moved).await.err().unwrap().diagnostics;
    assert_eq!(diags.iter().next().unwrap().summary, "Resource requires replacement");

    configured.delete(&state).await.unwrap();
    assert_eq!(cloud.fake.network("net-1").unwrap().connectors.len(), 1);
}

#[tokio::test]
async fn test_connector_create_keeps_id_when_profile_fetch_fails() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();

    cloud.fake.fail("get_connector_profile", 1);
    let failed = configured
        .create(
            "openvpncloud_connector",
            object(json!({
                "name": "backup-gw",
                "vpn_region_id": "eu-central-1",
                "network_item_type": "NETWORK",
                "network_item_id": "net-1"
            })),
        )
        .await
        .err()
        .unwrap();
    assert!(failed.diagnostics.has_errors());

    let partial = failed.partial.unwrap();
    assert_eq!(partial.id, "conn-4");
    assert!(partial.attributes["profile"].as_str().unwrap().contains("conn-4"));
    assert_eq!(cloud.fake.network("net-1").unwrap().connectors.len(), 2);
}

#[tokio::test]
async fn test_network_tracks_new_connector_when_old_one_cannot_be_removed() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();

    cloud.fake.fail("delete_connector", 1);
    let failed = configured
        .update(&state, network_config("office-gw-2", "10.10.0.0/16"))
        .await
        .err()
        .unwrap();
    let partial = failed.partial.unwrap();
    assert_eq!(partial.attributes["default_connector"][0]["id"], json!("conn-4"));
    assert_eq!(partial.created_at, state.created_at);

    // applying the same configuration again adds no further connector
    let again = configured
        .update(&partial, network_config("office-gw-2", "10.10.0.0/16"))
        .await
        .unwrap();
    assert_eq!(again.attributes["default_connector"][0]["id"], json!("conn-4"));
    assert_eq!(
        cloud.fake.calls(),
        vec!["create_network net-1", "add_connector conn-4"]
    );
}

#[tokio::test]
async fn test_route_lifecycle_and_composite_import_id() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    configured
        .create("openvpncloud_network", network_config("office-gw", "10.10.0.0/16"))
        .await
        .unwrap();

    let state = configured
        .create(
            "openvpncloud_route",
            object(json!({
                "type": "DOMAIN",
                "value": "corp.example.com",
                "network_item_id": "net-1"
            })),
        )
        .await
        .unwrap();
    assert_eq!(state.id, "route-4");
    assert_eq!(state.attributes["value"], json!("corp.example.com"));

    let updated = configured
        .update(
            &state,
            object(json!({
                "type": "DOMAIN",
                "value": "intranet.example.com",
                "network_item_id": "net-1"
            })),
        )
        .await
        .unwrap();
    assert_eq!(updated.attributes["value"], json!("intranet.example.com"));

    let imported = configured
        .import("openvpncloud_route", "net-1/route-4")
        .await
        .unwrap();
    assert_eq!(imported.id, "route-4");
    assert_eq!(imported.attributes["network_item_id"], json!("net-1"));
    assert_eq!(imported.attributes["type"], json!("DOMAIN"));

    let diags = configured
        .import("openvpncloud_route", "route-4")
        .await
        .err()
        .unwrap();
    assert_eq!(diags.iter().next().unwrap().summary, "Invalid import id");

    configured.delete(&updated).await.unwrap();
    assert_eq!(cloud.fake.network("net-1").unwrap().routes.len(), 1);
}

#[tokio::test]
async fn test_dns_record_lifecycle() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let config = object(json!({ "domain": "db.internal", "ip_v4_addresses": ["10.0.0.5"] }));
    let state = configured
        .create("openvpncloud_dns_record", config.clone())
        .await
        .unwrap();
    assert_eq!(state.attributes["ip_v4_addresses"], json!(["10.0.0.5"]));

    let same = configured.update(&state, config).await.unwrap();
    assert_eq!(same.updated_at, state.updated_at);

    let updated = configured
        .update(
            &state,
            object(json!({
                "domain": "db.internal",
                "ip_v4_addresses": ["10.0.0.5", "10.0.0.6"]
            })),
        )
        .await
        .unwrap();
    assert_eq!(updated.attributes["ip_v4_addresses"], json!(["10.0.0.5", "10.0.0.6"]));

    configured.delete(&updated).await.unwrap();
    assert!(configured.read(&updated).await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_devices_force_replacement() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let config = object(json!({
        "username": "alice",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Liddell",
        "devices": [{ "name": "laptop" }]
    }));
    let state = configured
        .create("openvpncloud_user", config.clone())
        .await
        .unwrap();
    assert_eq!(state.attributes["role"], json!("MEMBER"));
    assert_eq!(state.attributes["group_id"], json!("grp-default"));
    assert_eq!(state.attributes["devices"][0]["ipv4_address"], json!("100.96.64.2"));

    let mut new_email = config.clone();
    new_email.insert("email".to_string(), json!("alice@corp.example.com"));
    let updated = configured.update(&state, new_email).await.unwrap();
    assert_eq!(updated.attributes["email"], json!("alice@corp.example.com"));
    assert_eq!(
        cloud.fake.user(&state.id).unwrap().email,
        "alice@corp.example.com"
    );

    let mut new_device = config;
    new_device.insert("devices".to_string(), json!([{ "name": "phone" }]));
    let diags = configured.update(&updated, new_device).await.err().unwrap().diagnostics;
    assert_eq!(diags.iter().next().unwrap().summary, "Resource requires replacement");
}

#[tokio::test]
async fn test_refresh_clears_lists_emptied_remotely() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let user = configured
        .create(
            "openvpncloud_user",
            object(json!({
                "username": "alice",
                "email": "alice@example.com",
                "first_name": "Alice",
                "last_name": "Liddell",
                "devices": [{ "name": "laptop" }]
            })),
        )
        .await
        .unwrap();
    let group = configured
        .create(
            "openvpncloud_user_group",
            object(json!({ "name": "eng", "vpn_region_ids": ["eu-central-1"] })),
        )
        .await
        .unwrap();
    assert_eq!(group.attributes["vpn_region_ids"], json!(["eu-central-1"]));

    cloud.fake.edit_user(&user.id, |u| u.devices.clear());
    cloud.fake.edit_user_group(&group.id, |g| g.vpn_region_ids.clear());

    let user = configured.read(&user).await.unwrap().unwrap();
    assert!(user.attributes["devices"].is_null());
    let group = configured.read(&group).await.unwrap().unwrap();
    assert!(group.attributes["vpn_region_ids"].is_null());
}

#[tokio::test]
async fn test_host_connectors_are_diffed_by_name() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create(
            "openvpncloud_host",
            object(json!({
                "name": "db",
                "connector": [
                    { "name": "a", "vpn_region_id": "eu-central-1" },
                    { "name": "b", "vpn_region_id": "eu-central-1" }
                ]
            })),
        )
        .await
        .unwrap();
    assert_eq!(state.id, "host-1");
    assert_eq!(state.attributes["connector"].as_array().unwrap().len(), 2);

    let updated = configured
        .update(
            &state,
            object(json!({
                "name": "db",
                "connector": [
                    { "name": "b", "vpn_region_id": "eu-central-1" },
                    { "name": "c", "vpn_region_id": "us-west-1" }
                ]
            })),
        )
        .await
        .unwrap();

    assert_eq!(
        cloud.fake.calls(),
        vec!["create_host host-1", "delete_connector conn-2", "add_connector conn-4"]
    );
    let host = cloud.fake.host("host-1").unwrap();
    let names: Vec<_> = host.connectors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);
    assert_eq!(host.connectors[1].network_item_type, "HOST");
    assert_eq!(updated.attributes["connector"][1]["id"], json!("conn-4"));
}

#[tokio::test]
async fn test_user_group_defaults_and_update() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let state = configured
        .create("openvpncloud_user_group", object(json!({ "name": "eng" })))
        .await
        .unwrap();
    assert_eq!(state.attributes["max_device"], json!(3));
    assert_eq!(state.attributes["connect_auth"], json!("AUTO"));
    assert_eq!(state.attributes["system_subnets"], json!(["100.96.64.0/24"]));

    let same = configured
        .update(&state, object(json!({ "name": "eng" })))
        .await
        .unwrap();
    assert_eq!(same.updated_at, state.updated_at);

    let updated = configured
        .update(
            &state,
            object(json!({ "name": "eng", "max_device": 5, "connect_auth": "STRICT_AUTH" })),
        )
        .await
        .unwrap();
    assert_eq!(updated.attributes["max_device"], json!(5));
    assert_eq!(updated.attributes["system_subnets"], json!(["100.96.64.0/24"]));
}

#[tokio::test]
async fn test_service_config_block() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let config = object(json!({
        "name": "web",
        "type": "SERVICE_DESTINATION",
        "routes": ["10.0.0.10/32"],
        "network_item_type": "NETWORK",
        "network_item_id": "net-9",
        "config": [{
            "service_types": ["HTTP", "HTTPS"],
            "custom_service_types": [{ "protocol": "TCP", "from_port": 8443, "to_port": 8443 }]
        }]
    }));
    let state = configured
        .create("openvpncloud_service", config.clone())
        .await
        .unwrap();
    assert_eq!(state.attributes["routes"], json!(["10.0.0.10/32"]));
    assert_eq!(state.attributes["config"][0]["service_types"], json!(["HTTP", "HTTPS"]));
    assert_eq!(
        state.attributes["config"][0]["custom_service_types"][0]["from_port"],
        json!(8443)
    );

    let mut moved = config;
    moved.insert("network_item_id".to_string(), json!("net-10"));
    let diags = configured.update(&state, moved).await.err().unwrap().diagnostics;
    assert_eq!(diags.iter().next().unwrap().summary, "Resource requires replacement");

    let diags = configured
        .import("openvpncloud_service", &state.id)
        .await
        .err()
        .unwrap();
    assert_eq!(
        diags.iter().next().unwrap().summary,
        "Resource does not support import"
    );
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_any_call() {
    let cloud = TestCloud::new();
    let configured = cloud.provider.with_meta(cloud.meta());

    let diags = configured
        .create(
            "openvpncloud_network",
            object(json!({
                "name": "office",
                "internet_access": "EVERYWHERE",
                "default_connector": [{ "name": "gw", "vpn_region_id": "eu-central-1" }],
                "default_route": [{ "type": "IP_V4", "value": "10.0.0.0/16" }]
            })),
        )
        .await
        .err()
        .unwrap()
        .diagnostics;

    assert!(diags.iter().any(|d| d.summary == "Invalid value"));
    assert!(cloud.fake.calls().is_empty());
}
