//! `openvpncloud_network` data source

use super::{connector_block, not_found};
use crate::Meta;
use crate::flatten::{connector_to_value, route_to_value};
use async_trait::async_trait;
use openvpncloud_client::NetworkApi;
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema, ValueType};
use serde_json::Value;

pub struct NetworkDataSource;

#[async_trait]
impl DataSource<Meta> for NetworkDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("network_id", Attribute::string().computed())
            .attr("description", Attribute::string().computed())
            .attr("egress", Attribute::bool().computed())
            .attr("internet_access", Attribute::string().computed())
            .attr("system_subnets", Attribute::list_of(ValueType::String).computed())
            .attr(
                "routes",
                Attribute::list_of_blocks(
                    Schema::new()
                        .attr("id", Attribute::string().computed())
                        .attr("type", Attribute::string().computed())
                        .attr("value", Attribute::string().computed())
                        .attr("description", Attribute::string().computed()),
                )
                .computed(),
            )
            .attr("connectors", Attribute::list_of_blocks(connector_block()).computed())
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let name = d.get_str("name").to_string();
        let network = client
            .get_network_by_name(&name)
            .await?
            .ok_or_else(|| not_found("Network", &name))?;

        let routes: Vec<Value> = network.routes.iter().map(route_to_value).collect();
        let connectors: Vec<Value> = network.connectors.iter().map(connector_to_value).collect();

        d.set("network_id", network.id.clone());
        d.set("description", network.description);
        d.set("egress", network.egress);
        d.set("internet_access", network.internet_access);
        d.set("system_subnets", network.system_subnets);
        d.set("routes", routes);
        d.set("connectors", connectors);
        d.set_id(network.id);
        Ok(())
    }
}
