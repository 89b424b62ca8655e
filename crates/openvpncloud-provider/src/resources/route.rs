//! `openvpncloud_route`
//!
//! Routes live under a network, so the import id is
//! `<network_item_id>/<route_id>`.

use crate::{DEFAULT_DESCRIPTION, Meta};
use async_trait::async_trait;
use openvpncloud_client::{
    ROUTE_TYPE_DOMAIN, ROUTE_TYPE_IP_V4, ROUTE_TYPE_IP_V6, Route, RouteApi,
};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema};

pub struct RouteResource;

fn route_from_data(d: &ResourceData) -> Route {
    let mut route = Route::new(d.get_str("type"), d.get_str("value"))
        .with_description(d.get_str("description"));
    route.id = d.id().to_string();
    route
}

#[async_trait]
impl Resource<Meta> for RouteResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "type",
                Attribute::string()
                    .required()
                    .force_new()
                    .one_of(&[ROUTE_TYPE_IP_V4, ROUTE_TYPE_IP_V6, ROUTE_TYPE_DOMAIN]),
            )
            .attr("value", Attribute::string().required().description("Subnet or domain"))
            .attr(
                "description",
                Attribute::string().optional().default(DEFAULT_DESCRIPTION),
            )
            .attr("network_item_id", Attribute::string().required().force_new())
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let network_id = d.get_str("network_item_id").to_string();
        let created = client.create_route(&network_id, &route_from_data(d)).await?;
        tracing::info!("Created route {} on network {}", created.id, network_id);
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let network_id = d.get_str("network_item_id").to_string();
        let Some(route) = client.get_network_route(&network_id, d.id()).await? else {
            tracing::warn!("Route {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("type", route.route_type.clone());
        d.set("value", route.value().to_string());
        d.set("description", route.description);
        Ok(())
    }

    async fn update(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        if d.has_changes(&["value", "description"]) {
            let network_id = d.get_str("network_item_id").to_string();
            client.update_route(&network_id, &route_from_data(d)).await?;
        }
        self.read(client, d).await
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client
            .delete_route(d.get_str("network_item_id"), d.id())
            .await?;
        Ok(())
    }

    fn import(&self, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let (network_id, route_id) = match d.id().split_once('/') {
            Some((network_id, route_id)) if !network_id.is_empty() && !route_id.is_empty() => {
                (network_id.to_string(), route_id.to_string())
            }
            _ => {
                return Err(Diagnostics::error(
                    "Invalid import id",
                    format!(
                        "Expected <network_item_id>/<route_id>, got \"{}\".",
                        d.id()
                    ),
                ));
            }
        };

        d.set("network_item_id", network_id);
        d.set_id(route_id);
        Ok(())
    }
}
