//! VPN regions (read-only)

use crate::client::Client;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VpnRegion {
    pub id: String,
    pub continent: String,
    pub country: String,
    #[serde(rename = "countryISO")]
    pub country_iso: String,
    pub region_name: String,
}

#[async_trait]
pub trait VpnRegionApi: Send + Sync {
    async fn list_vpn_regions(&self) -> Result<Vec<VpnRegion>>;

    async fn get_vpn_region(&self, id: &str) -> Result<Option<VpnRegion>>;
}

#[async_trait]
impl VpnRegionApi for Client {
    async fn list_vpn_regions(&self) -> Result<Vec<VpnRegion>> {
        self.send_json(self.request(Method::GET, "/regions")).await
    }

    async fn get_vpn_region(&self, id: &str) -> Result<Option<VpnRegion>> {
        let regions = self.list_vpn_regions().await?;
        Ok(regions.into_iter().find(|r| r.id == id))
    }
}
