//! Private DNS records

use crate::client::Client;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DnsRecord {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub domain: String,
    pub description: String,
    pub ipv4_addresses: Vec<String>,
    pub ipv6_addresses: Vec<String>,
}

#[async_trait]
pub trait DnsRecordApi: Send + Sync {
    async fn create_dns_record(&self, record: &DnsRecord) -> Result<DnsRecord>;

    async fn get_dns_record(&self, id: &str) -> Result<Option<DnsRecord>>;

    async fn list_dns_records(&self) -> Result<Vec<DnsRecord>>;

    async fn update_dns_record(&self, record: &DnsRecord) -> Result<DnsRecord>;

    async fn delete_dns_record(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl DnsRecordApi for Client {
    async fn create_dns_record(&self, record: &DnsRecord) -> Result<DnsRecord> {
        tracing::debug!("Creating DNS record {}", record.domain);
        self.send_json(self.request(Method::POST, "/dns-records").json(record))
            .await
    }

    async fn get_dns_record(&self, id: &str) -> Result<Option<DnsRecord>> {
        let records = self.list_dns_records().await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    async fn list_dns_records(&self) -> Result<Vec<DnsRecord>> {
        self.get_all_pages("/dns-records", &[]).await
    }

    async fn update_dns_record(&self, record: &DnsRecord) -> Result<DnsRecord> {
        self.send_json(
            self.request(Method::PUT, &format!("/dns-records/{}", record.id))
                .json(record),
        )
        .await
    }

    async fn delete_dns_record(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/dns-records/{}", id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_field_names() {
        let record = DnsRecord {
            domain: "db.internal".to_string(),
            ipv4_addresses: vec!["10.0.0.5".to_string()],
            ..Default::default()
        };
        let body = serde_json::to_value(&record).unwrap();
        assert_eq!(body["ipv4Addresses"], json!(["10.0.0.5"]));
        assert_eq!(body["ipv6Addresses"], json!([]));
    }
}
