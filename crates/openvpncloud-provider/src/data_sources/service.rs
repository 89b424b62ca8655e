//! `openvpncloud_service` data source

use super::not_found;
use crate::Meta;
use crate::flatten::service_config_to_value;
use crate::resources::service_config_block;
use async_trait::async_trait;
use openvpncloud_client::ServiceApi;
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema, ValueType};
use serde_json::Value;

pub struct ServiceDataSource;

#[async_trait]
impl DataSource<Meta> for ServiceDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("service_id", Attribute::string().computed())
            .attr("description", Attribute::string().computed())
            .attr("type", Attribute::string().computed())
            .attr("routes", Attribute::list_of(ValueType::String).computed())
            .attr(
                "config",
                Attribute::list_of_blocks(service_config_block()).computed(),
            )
            .attr("network_item_type", Attribute::string().computed())
            .attr("network_item_id", Attribute::string().computed())
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let name = d.get_str("name").to_string();
        let service = client
            .get_service_by_name(&name)
            .await?
            .ok_or_else(|| not_found("Service", &name))?;

        let routes: Vec<String> = service.routes.iter().map(|r| r.value.clone()).collect();
        let config: Vec<Value> = service.config.iter().map(service_config_to_value).collect();

        d.set("service_id", service.id.clone());
        d.set("description", service.description);
        d.set("type", service.service_type);
        d.set("routes", routes);
        d.set("config", config);
        d.set("network_item_type", service.network_item_type);
        d.set("network_item_id", service.network_item_id);
        d.set_id(service.id);
        Ok(())
    }
}
