//! `openvpncloud_service`

use crate::flatten::{service_config_from_block, service_config_to_value};
use crate::{DEFAULT_DESCRIPTION, Meta};
use async_trait::async_trait;
use openvpncloud_client::{
    NETWORK_ITEM_TYPE_HOST, NETWORK_ITEM_TYPE_NETWORK, SERVICE_TYPE_DESTINATION,
    SERVICE_TYPE_IP_SOURCE, SERVICE_TYPES, Service, ServiceApi, ServiceRoute,
};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema, ValueType};
use serde_json::Value;

pub struct ServiceResource;

/// Schema of the optional `config` block, shared with the data source
pub(crate) fn config_block() -> Schema {
    Schema::new()
        .attr(
            "service_types",
            Attribute::list_of(ValueType::String)
                .optional()
                .description(format!("Any of: {}", SERVICE_TYPES.join(", "))),
        )
        .attr(
            "custom_service_types",
            Attribute::set_of_blocks(
                Schema::new()
                    .attr(
                        "protocol",
                        Attribute::string().required().one_of(&["TCP", "UDP", "ICMP"]),
                    )
                    .attr("from_port", Attribute::int().required())
                    .attr("to_port", Attribute::int().required()),
            )
            .optional(),
        )
}

fn service_from_data(d: &ResourceData) -> Service {
    let description = d.get_str("description").to_string();
    Service {
        id: d.id().to_string(),
        name: d.get_str("name").to_string(),
        description: description.clone(),
        service_type: d.get_str("type").to_string(),
        routes: d
            .get_string_list("routes")
            .into_iter()
            .map(|value| ServiceRoute {
                value,
                description: description.clone(),
            })
            .collect(),
        config: d.get_block("config").map(|b| service_config_from_block(&b)),
        network_item_type: d.get_str("network_item_type").to_string(),
        network_item_id: d.get_str("network_item_id").to_string(),
    }
}

#[async_trait]
impl Resource<Meta> for ServiceResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr(
                "description",
                Attribute::string().optional().default(DEFAULT_DESCRIPTION),
            )
            .attr(
                "type",
                Attribute::string()
                    .required()
                    .one_of(&[SERVICE_TYPE_DESTINATION, SERVICE_TYPE_IP_SOURCE]),
            )
            .attr(
                "routes",
                Attribute::list_of(ValueType::String).required().min_items(1),
            )
            .attr(
                "config",
                Attribute::list_of_blocks(config_block()).optional().max_items(1),
            )
            .attr(
                "network_item_type",
                Attribute::string()
                    .required()
                    .force_new()
                    .one_of(&[NETWORK_ITEM_TYPE_NETWORK, NETWORK_ITEM_TYPE_HOST]),
            )
            .attr("network_item_id", Attribute::string().required().force_new())
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let created = client.create_service(&service_from_data(d)).await?;
        tracing::info!("Created service {} ({})", created.name, created.id);
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let service = client
            .get_service(
                d.id(),
                d.get_str("network_item_type"),
                d.get_str("network_item_id"),
            )
            .await?;
        let Some(service) = service else {
            tracing::warn!("Service {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("name", service.name);
        d.set("description", service.description);
        d.set("type", service.service_type);
        let routes: Vec<String> = service.routes.into_iter().map(|r| r.value).collect();
        d.set("routes", routes);
        if let Some(config) = &service.config {
            d.set("config", Value::Array(vec![service_config_to_value(config)]));
        }
        d.set("network_item_type", service.network_item_type);
        d.set("network_item_id", service.network_item_id);
        Ok(())
    }

    async fn update(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.update_service(&service_from_data(d)).await?;
        self.read(client, d).await
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client
            .delete_service(
                d.id(),
                d.get_str("network_item_type"),
                d.get_str("network_item_id"),
            )
            .await?;
        Ok(())
    }
}
