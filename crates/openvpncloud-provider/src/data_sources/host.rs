//! `openvpncloud_host` data source

use super::{connector_block, not_found};
use crate::Meta;
use crate::flatten::connector_to_value;
use async_trait::async_trait;
use openvpncloud_client::HostApi;
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema, ValueType};
use serde_json::Value;

pub struct HostDataSource;

#[async_trait]
impl DataSource<Meta> for HostDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("host_id", Attribute::string().computed())
            .attr("description", Attribute::string().computed())
            .attr("domain", Attribute::string().computed())
            .attr("internet_access", Attribute::string().computed())
            .attr("system_subnets", Attribute::list_of(ValueType::String).computed())
            .attr("connectors", Attribute::list_of_blocks(connector_block()).computed())
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let name = d.get_str("name").to_string();
        let host = client
            .get_host_by_name(&name)
            .await?
            .ok_or_else(|| not_found("Host", &name))?;

        let connectors: Vec<Value> = host.connectors.iter().map(connector_to_value).collect();

        d.set("host_id", host.id.clone());
        d.set("description", host.description);
        d.set("domain", host.domain);
        d.set("internet_access", host.internet_access);
        d.set("system_subnets", host.system_subnets);
        d.set("connectors", connectors);
        d.set_id(host.id);
        Ok(())
    }
}
