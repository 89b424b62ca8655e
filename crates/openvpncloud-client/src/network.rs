//! Networks

use crate::client::Client;
use crate::connector::Connector;
use crate::error::{OptionalExt, Result};
use crate::route::Route;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const INTERNET_ACCESS_BLOCKED: &str = "BLOCKED";
pub const INTERNET_ACCESS_GLOBAL_INTERNET: &str = "GLOBAL_INTERNET";
pub const INTERNET_ACCESS_LOCAL: &str = "LOCAL";

/// A network with its connectors and routes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Network {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub egress: bool,
    pub internet_access: String,
    pub system_subnets: Vec<String>,
    pub connectors: Vec<Connector>,
    pub routes: Vec<Route>,
}

#[async_trait]
pub trait NetworkApi: Send + Sync {
    async fn create_network(&self, network: &Network) -> Result<Network>;

    async fn get_network_by_id(&self, id: &str) -> Result<Option<Network>>;

    async fn get_network_by_name(&self, name: &str) -> Result<Option<Network>>;

    async fn list_networks(&self) -> Result<Vec<Network>>;

    /// Update name, description, egress and internet access
    async fn update_network(&self, network: &Network) -> Result<Network>;

    async fn delete_network(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl NetworkApi for Client {
    async fn create_network(&self, network: &Network) -> Result<Network> {
        tracing::debug!("Creating network {}", network.name);
        self.send_json(self.request(Method::POST, "/networks").json(network))
            .await
    }

    async fn get_network_by_id(&self, id: &str) -> Result<Option<Network>> {
        self.send_json::<Network>(self.request(Method::GET, &format!("/networks/{}", id)))
            .await
            .optional()
    }

    async fn get_network_by_name(&self, name: &str) -> Result<Option<Network>> {
        let networks = self.list_networks().await?;
        Ok(networks.into_iter().find(|n| n.name == name))
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        self.get_all_pages("/networks", &[]).await
    }

    async fn update_network(&self, network: &Network) -> Result<Network> {
        self.send_json(
            self.request(Method::PUT, &format!("/networks/{}", network.id))
                .json(network),
        )
        .await
    }

    async fn delete_network(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/networks/{}", id)))
            .await
    }
}
