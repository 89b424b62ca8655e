//! `openvpncloud_network`
//!
//! A network is created together with its default connector and default
//! route. Afterwards the connector is replaced by adding the new one before
//! deleting the old one, so the network never has zero connectors.

use crate::{DEFAULT_DESCRIPTION, Meta};
use crate::flatten::{connector_from_block, connector_to_value, route_from_block, route_to_value};
use async_trait::async_trait;
use openvpncloud_client::{
    ConnectorApi, INTERNET_ACCESS_BLOCKED, INTERNET_ACCESS_GLOBAL_INTERNET,
    INTERNET_ACCESS_LOCAL, NETWORK_ITEM_TYPE_NETWORK, Network, NetworkApi, ROUTE_TYPE_DOMAIN,
    ROUTE_TYPE_IP_V4, ROUTE_TYPE_IP_V6, RouteApi,
};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema, ValueType};
use serde_json::Value;

pub struct NetworkResource;

fn connector_block() -> Schema {
    Schema::new()
        .attr("id", Attribute::string().computed())
        .attr("name", Attribute::string().required())
        .attr("vpn_region_id", Attribute::string().required())
        .attr("description", Attribute::string().optional().default(DEFAULT_DESCRIPTION))
        .attr("ip_v4_address", Attribute::string().computed())
        .attr("ip_v6_address", Attribute::string().computed())
        .attr("network_item_id", Attribute::string().computed())
        .attr("network_item_type", Attribute::string().computed())
}

fn route_block() -> Schema {
    Schema::new()
        .attr("id", Attribute::string().computed())
        .attr(
            "type",
            Attribute::string()
                .required()
                .one_of(&[ROUTE_TYPE_IP_V4, ROUTE_TYPE_IP_V6, ROUTE_TYPE_DOMAIN]),
        )
        .attr("value", Attribute::string().required().description("Subnet or domain"))
        .attr("description", Attribute::string().optional().default(DEFAULT_DESCRIPTION))
}

fn network_from_data(d: &ResourceData) -> Network {
    Network {
        id: d.id().to_string(),
        name: d.get_str("name").to_string(),
        description: d.get_str("description").to_string(),
        egress: d.get_bool("egress"),
        internet_access: d.get_str("internet_access").to_string(),
        ..Default::default()
    }
}

/// Id recorded in the first block of `key`, empty when there is none
fn block_id(fields: &impl Fields, key: &str) -> String {
    fields
        .get_block(key)
        .map(|b| b.get_str("id").to_string())
        .unwrap_or_default()
}

fn missing_block(key: &str) -> Diagnostics {
    Diagnostics::error(
        "Missing required block",
        format!("Exactly one \"{}\" block is required.", key),
    )
}

#[async_trait]
impl Resource<Meta> for NetworkResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr(
                "description",
                Attribute::string().optional().default(DEFAULT_DESCRIPTION),
            )
            .attr(
                "egress",
                Attribute::bool()
                    .optional()
                    .default(true)
                    .description("Route internet traffic through the network"),
            )
            .attr(
                "internet_access",
                Attribute::string()
                    .optional()
                    .default(INTERNET_ACCESS_LOCAL)
                    .one_of(&[
                        INTERNET_ACCESS_BLOCKED,
                        INTERNET_ACCESS_GLOBAL_INTERNET,
                        INTERNET_ACCESS_LOCAL,
                    ]),
            )
            .attr("system_subnets", Attribute::set_of(ValueType::String).computed())
            .attr(
                "default_route",
                Attribute::list_of_blocks(route_block())
                    .required()
                    .min_items(1)
                    .max_items(1),
            )
            .attr(
                "default_connector",
                Attribute::list_of_blocks(connector_block())
                    .required()
                    .min_items(1)
                    .max_items(1),
            )
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let mut network = network_from_data(d);
        let connector = d
            .get_block("default_connector")
            .map(|b| connector_from_block(&b, NETWORK_ITEM_TYPE_NETWORK))
            .ok_or_else(|| missing_block("default_connector"))?;
        let route = d
            .get_block("default_route")
            .map(|b| route_from_block(&b))
            .ok_or_else(|| missing_block("default_route"))?;
        network.connectors = vec![connector];
        network.routes = vec![route];

        let created = client.create_network(&network).await?;
        tracing::info!("Created network {} ({})", created.name, created.id);
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let Some(network) = client.get_network_by_id(d.id()).await? else {
            tracing::warn!("Network {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("name", network.name.clone());
        d.set("description", network.description.clone());
        d.set("egress", network.egress);
        d.set("internet_access", network.internet_access.clone());
        d.set("system_subnets", network.system_subnets.clone());

        // Prefer the recorded connector; fall back to the configured name,
        // then to whatever the network reports first.
        let connector_id = block_id(&*d, "default_connector");
        let connector_name = d
            .get_block("default_connector")
            .map(|b| b.get_str("name").to_string())
            .unwrap_or_default();
        let connector = network
            .connectors
            .iter()
            .find(|c| !connector_id.is_empty() && c.id == connector_id)
            .or_else(|| network.connectors.iter().find(|c| c.name == connector_name))
            .or_else(|| network.connectors.first());
        if let Some(connector) = connector {
            d.set("default_connector", Value::Array(vec![connector_to_value(connector)]));
        }

        let route_id = block_id(&*d, "default_route");
        let route = network
            .routes
            .iter()
            .find(|r| !route_id.is_empty() && r.id == route_id)
            .or_else(|| network.routes.first());
        if let Some(route) = route {
            d.set("default_route", Value::Array(vec![route_to_value(route)]));
        }

        Ok(())
    }

    async fn update(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let network_id = d.id().to_string();

        if d.has_change("default_connector") {
            let old_id = d
                .prior()
                .map(|p| block_id(&p, "default_connector"))
                .unwrap_or_default();
            let connector = d
                .get_block("default_connector")
                .map(|b| connector_from_block(&b, NETWORK_ITEM_TYPE_NETWORK))
                .ok_or_else(|| missing_block("default_connector"))?;

            let added = client.add_connector(&connector, &network_id).await?;
            tracing::info!("Added connector {} to network {}", added.id, network_id);
            // tracked even if removing the old connector fails
            d.set("default_connector", Value::Array(vec![connector_to_value(&added)]));
            if !old_id.is_empty() {
                client
                    .delete_connector(&old_id, &network_id, NETWORK_ITEM_TYPE_NETWORK)
                    .await?;
                tracing::info!("Removed connector {} from network {}", old_id, network_id);
            }
        }

        if d.has_change("default_route") {
            let mut route = d
                .get_block("default_route")
                .map(|b| route_from_block(&b))
                .ok_or_else(|| missing_block("default_route"))?;
            route.id = d
                .prior()
                .map(|p| block_id(&p, "default_route"))
                .unwrap_or_default();

            let updated = client.update_route(&network_id, &route).await?;
            d.set("default_route", Value::Array(vec![route_to_value(&updated)]));
        }

        if d.has_changes(&["name", "description", "egress", "internet_access"]) {
            client.update_network(&network_from_data(d)).await?;
        }

        self.read(client, d).await
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.delete_network(d.id()).await?;
        Ok(())
    }

    fn import(&self, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Ok(())
    }
}
