//! `openvpncloud_user_group` data source

use super::not_found;
use crate::Meta;
use async_trait::async_trait;
use openvpncloud_client::UserGroupApi;
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema, ValueType};

pub struct UserGroupDataSource;

#[async_trait]
impl DataSource<Meta> for UserGroupDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("user_group_id", Attribute::string().computed())
            .attr("vpn_region_ids", Attribute::list_of(ValueType::String).computed())
            .attr("internet_access", Attribute::string().computed())
            .attr("max_device", Attribute::int().computed())
            .attr("connect_auth", Attribute::string().computed())
            .attr("system_subnets", Attribute::list_of(ValueType::String).computed())
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let name = d.get_str("name").to_string();
        let group = client
            .get_user_group(&name)
            .await?
            .ok_or_else(|| not_found("User group", &name))?;

        d.set("user_group_id", group.id.clone());
        d.set("vpn_region_ids", group.vpn_region_ids);
        d.set("internet_access", group.internet_access);
        d.set("max_device", group.max_device);
        d.set("connect_auth", group.connect_auth);
        d.set("system_subnets", group.system_subnets);
        d.set_id(group.id);
        Ok(())
    }
}
