//! `openvpncloud_vpn_region` data source

use crate::Meta;
use async_trait::async_trait;
use openvpncloud_client::VpnRegionApi;
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema};

pub struct VpnRegionDataSource;

#[async_trait]
impl DataSource<Meta> for VpnRegionDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("region_id", Attribute::string().required())
            .attr("continent", Attribute::string().computed())
            .attr("country", Attribute::string().computed())
            .attr("country_iso", Attribute::string().computed())
            .attr("region_name", Attribute::string().computed())
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let region_id = d.get_str("region_id").to_string();
        let region = client.get_vpn_region(&region_id).await?.ok_or_else(|| {
            Diagnostics::error(format!("VPN region with id {} was not found", region_id), "")
        })?;

        d.set("continent", region.continent);
        d.set("country", region.country);
        d.set("country_iso", region.country_iso);
        d.set("region_name", region.region_name);
        d.set_id(region.id);
        Ok(())
    }
}
