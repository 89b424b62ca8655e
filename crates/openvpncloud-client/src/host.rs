//! Hosts

use crate::client::Client;
use crate::connector::Connector;
use crate::error::{OptionalExt, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Host {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub domain: String,
    pub internet_access: String,
    pub system_subnets: Vec<String>,
    pub connectors: Vec<Connector>,
}

#[async_trait]
pub trait HostApi: Send + Sync {
    async fn create_host(&self, host: &Host) -> Result<Host>;

    async fn get_host_by_id(&self, id: &str) -> Result<Option<Host>>;

    async fn get_host_by_name(&self, name: &str) -> Result<Option<Host>>;

    async fn list_hosts(&self) -> Result<Vec<Host>>;

    /// Update the host's own fields; connectors are managed separately
    async fn update_host(&self, host: &Host) -> Result<Host>;

    async fn delete_host(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl HostApi for Client {
    async fn create_host(&self, host: &Host) -> Result<Host> {
        tracing::debug!("Creating host {}", host.name);
        self.send_json(self.request(Method::POST, "/hosts").json(host))
            .await
    }

    async fn get_host_by_id(&self, id: &str) -> Result<Option<Host>> {
        self.send_json::<Host>(self.request(Method::GET, &format!("/hosts/{}", id)))
            .await
            .optional()
    }

    async fn get_host_by_name(&self, name: &str) -> Result<Option<Host>> {
        let hosts = self.list_hosts().await?;
        Ok(hosts.into_iter().find(|h| h.name == name))
    }

    async fn list_hosts(&self) -> Result<Vec<Host>> {
        self.get_all_pages("/hosts", &[]).await
    }

    async fn update_host(&self, host: &Host) -> Result<Host> {
        self.send_json(self.request(Method::PUT, &format!("/hosts/{}", host.id)).json(host))
            .await
    }

    async fn delete_host(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/hosts/{}", id)))
            .await
    }
}
