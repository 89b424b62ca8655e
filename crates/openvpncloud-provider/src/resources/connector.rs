//! `openvpncloud_connector`

use crate::{DEFAULT_DESCRIPTION, Meta};
use async_trait::async_trait;
use openvpncloud_client::{
    Connector, ConnectorApi, NETWORK_ITEM_TYPE_HOST, NETWORK_ITEM_TYPE_NETWORK,
};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema};

pub struct ConnectorResource;

#[async_trait]
impl Resource<Meta> for ConnectorResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required().force_new())
            .attr("vpn_region_id", Attribute::string().required().force_new())
            .attr(
                "network_item_type",
                Attribute::string()
                    .required()
                    .force_new()
                    .one_of(&[NETWORK_ITEM_TYPE_NETWORK, NETWORK_ITEM_TYPE_HOST]),
            )
            .attr("network_item_id", Attribute::string().required().force_new())
            .attr(
                "description",
                Attribute::string()
                    .optional()
                    .force_new()
                    .default(DEFAULT_DESCRIPTION),
            )
            .attr("ip_v4_address", Attribute::string().computed())
            .attr("ip_v6_address", Attribute::string().computed())
            .attr(
                "profile",
                Attribute::string()
                    .computed()
                    .sensitive()
                    .description("OpenVPN profile used to install the connector"),
            )
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let connector = Connector {
            name: d.get_str("name").to_string(),
            vpn_region_id: d.get_str("vpn_region_id").to_string(),
            network_item_type: d.get_str("network_item_type").to_string(),
            description: d.get_str("description").to_string(),
            ..Default::default()
        };
        let network_item_id = d.get_str("network_item_id").to_string();

        let created = client.add_connector(&connector, &network_item_id).await?;
        tracing::info!(
            "Created connector {} on {} {}",
            created.id,
            connector.network_item_type,
            network_item_id
        );
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let Some(connector) = client.get_connector_by_id(d.id()).await? else {
            tracing::warn!("Connector {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("name", connector.name);
        d.set("vpn_region_id", connector.vpn_region_id);
        d.set("network_item_type", connector.network_item_type);
        d.set("network_item_id", connector.network_item_id);
        d.set("description", connector.description);
        d.set("ip_v4_address", connector.ip_v4_address);
        d.set("ip_v6_address", connector.ip_v6_address);

        if d.get_str("profile").is_empty() {
            let profile = client.get_connector_profile(d.id()).await?;
            d.set("profile", profile);
        }

        Ok(())
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client
            .delete_connector(
                d.id(),
                d.get_str("network_item_id"),
                d.get_str("network_item_type"),
            )
            .await?;
        Ok(())
    }

    fn import(&self, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Ok(())
    }
}
