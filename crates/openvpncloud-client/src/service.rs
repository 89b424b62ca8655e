//! Services published behind a network or host

use crate::client::Client;
use crate::error::{OptionalExt, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const SERVICE_TYPE_DESTINATION: &str = "SERVICE_DESTINATION";
pub const SERVICE_TYPE_IP_SOURCE: &str = "IP_SOURCE";

/// Well-known protocols a service may allow
pub const SERVICE_TYPES: &[&str] = &[
    "ANY", "BGP", "CUSTOM", "DHCP", "DNS", "FTP", "HTTP", "HTTPS", "IMAP", "IMAPS", "NTP", "POP3",
    "POP3S", "SMTP", "SMTPS", "SNMP", "SSH", "TELNET", "TFTP",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceRoute {
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomServiceType {
    pub protocol: String,
    pub from_port: i64,
    pub to_port: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub service_types: Vec<String>,
    pub custom_service_types: Vec<CustomServiceType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub routes: Vec<ServiceRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ServiceConfig>,
    pub network_item_type: String,
    pub network_item_id: String,
}

#[async_trait]
pub trait ServiceApi: Send + Sync {
    async fn create_service(&self, service: &Service) -> Result<Service>;

    async fn get_service(
        &self,
        id: &str,
        network_item_type: &str,
        network_item_id: &str,
    ) -> Result<Option<Service>>;

    async fn get_service_by_name(&self, name: &str) -> Result<Option<Service>>;

    async fn list_services(&self) -> Result<Vec<Service>>;

    async fn update_service(&self, service: &Service) -> Result<Service>;

    async fn delete_service(
        &self,
        id: &str,
        network_item_type: &str,
        network_item_id: &str,
    ) -> Result<()>;
}

#[async_trait]
impl ServiceApi for Client {
    async fn create_service(&self, service: &Service) -> Result<Service> {
        tracing::debug!(
            "Creating service {} on {} {}",
            service.name,
            service.network_item_type,
            service.network_item_id
        );
        let builder = self
            .request(Method::POST, "/services")
            .query(&[
                ("networkItemId", service.network_item_id.as_str()),
                ("networkItemType", service.network_item_type.as_str()),
            ])
            .json(service);
        self.send_json(builder).await
    }

    async fn get_service(
        &self,
        id: &str,
        network_item_type: &str,
        network_item_id: &str,
    ) -> Result<Option<Service>> {
        let builder = self
            .request(Method::GET, &format!("/services/{}", id))
            .query(&[
                ("networkItemId", network_item_id),
                ("networkItemType", network_item_type),
            ]);
        self.send_json::<Service>(builder).await.optional()
    }

    async fn get_service_by_name(&self, name: &str) -> Result<Option<Service>> {
        let services = self.list_services().await?;
        Ok(services.into_iter().find(|s| s.name == name))
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.get_all_pages("/services", &[]).await
    }

    async fn update_service(&self, service: &Service) -> Result<Service> {
        let builder = self
            .request(Method::PUT, &format!("/services/{}", service.id))
            .query(&[
                ("networkItemId", service.network_item_id.as_str()),
                ("networkItemType", service.network_item_type.as_str()),
            ])
            .json(service);
        self.send_json(builder).await
    }

    async fn delete_service(
        &self,
        id: &str,
        network_item_type: &str,
        network_item_id: &str,
    ) -> Result<()> {
        let builder = self
            .request(Method::DELETE, &format!("/services/{}", id))
            .query(&[
                ("networkItemId", network_item_id),
                ("networkItemType", network_item_type),
            ]);
        self.send_empty(builder).await
    }
}
