//! Connectors attached to networks and hosts

use crate::client::Client;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const NETWORK_ITEM_TYPE_NETWORK: &str = "NETWORK";
pub const NETWORK_ITEM_TYPE_HOST: &str = "HOST";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connector {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub network_item_id: String,
    pub network_item_type: String,
    pub vpn_region_id: String,
    pub ip_v4_address: String,
    pub ip_v6_address: String,
    pub description: String,
}

#[async_trait]
pub trait ConnectorApi: Send + Sync {
    /// Attach a new connector to the network or host `network_item_id`
    ///
    /// The item type is taken from `connector.network_item_type`.
    async fn add_connector(&self, connector: &Connector, network_item_id: &str) -> Result<Connector>;

    async fn list_connectors(&self) -> Result<Vec<Connector>>;

    async fn get_connector_by_id(&self, id: &str) -> Result<Option<Connector>>;

    async fn get_connector_by_name(&self, name: &str) -> Result<Option<Connector>>;

    async fn delete_connector(
        &self,
        id: &str,
        network_item_id: &str,
        network_item_type: &str,
    ) -> Result<()>;

    /// OpenVPN profile (`.ovpn` contents) for installing the connector
    async fn get_connector_profile(&self, id: &str) -> Result<String>;
}

#[async_trait]
impl ConnectorApi for Client {
    async fn add_connector(&self, connector: &Connector, network_item_id: &str) -> Result<Connector> {
        tracing::debug!(
            "Adding connector {} to {} {}",
            connector.name,
            connector.network_item_type,
            network_item_id
        );
        let builder = self
            .request(Method::POST, "/connectors")
            .query(&[
                ("networkItemId", network_item_id),
                ("networkItemType", connector.network_item_type.as_str()),
            ])
            .json(connector);
        self.send_json(builder).await
    }

    async fn list_connectors(&self) -> Result<Vec<Connector>> {
        self.get_all_pages("/connectors", &[]).await
    }

    async fn get_connector_by_id(&self, id: &str) -> Result<Option<Connector>> {
        let connectors = self.list_connectors().await?;
        Ok(connectors.into_iter().find(|c| c.id == id))
    }

    async fn get_connector_by_name(&self, name: &str) -> Result<Option<Connector>> {
        let connectors = self.list_connectors().await?;
        Ok(connectors.into_iter().find(|c| c.name == name))
    }

    async fn delete_connector(
        &self,
        id: &str,
        network_item_id: &str,
        network_item_type: &str,
    ) -> Result<()> {
        let builder = self
            .request(Method::DELETE, &format!("/connectors/{}", id))
            .query(&[
                ("networkItemId", network_item_id),
                ("networkItemType", network_item_type),
            ]);
        self.send_empty(builder).await
    }

    async fn get_connector_profile(&self, id: &str) -> Result<String> {
        self.send_text(self.request(Method::POST, &format!("/connectors/{}/profile", id)))
            .await
    }
}
