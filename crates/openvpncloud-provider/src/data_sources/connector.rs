//! `openvpncloud_connector` data source

use super::not_found;
use crate::Meta;
use async_trait::async_trait;
use openvpncloud_client::ConnectorApi;
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema};

pub struct ConnectorDataSource;

#[async_trait]
impl DataSource<Meta> for ConnectorDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().computed())
            .attr("network_item_id", Attribute::string().computed())
            .attr("network_item_type", Attribute::string().computed())
            .attr("vpn_region_id", Attribute::string().computed())
            .attr("ip_v4_address", Attribute::string().computed())
            .attr("ip_v6_address", Attribute::string().computed())
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let name = d.get_str("name").to_string();
        let connector = client
            .get_connector_by_name(&name)
            .await?
            .ok_or_else(|| not_found("Connector", &name))?;

        d.set("description", connector.description);
        d.set("network_item_id", connector.network_item_id);
        d.set("network_item_type", connector.network_item_type);
        d.set("vpn_region_id", connector.vpn_region_id);
        d.set("ip_v4_address", connector.ip_v4_address);
        d.set("ip_v6_address", connector.ip_v6_address);
        d.set_id(connector.id);
        Ok(())
    }
}
