//! `openvpncloud_user_group`

use crate::Meta;
use crate::flatten::non_empty;
use async_trait::async_trait;
use openvpncloud_client::{
    CONNECT_AUTH_AUTH, CONNECT_AUTH_AUTO, CONNECT_AUTH_STRICT_AUTH, INTERNET_ACCESS_BLOCKED,
    INTERNET_ACCESS_GLOBAL_INTERNET, INTERNET_ACCESS_LOCAL, UserGroup, UserGroupApi,
};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema, ValueType};

pub struct UserGroupResource;

fn group_from_data(d: &ResourceData) -> UserGroup {
    UserGroup {
        id: d.id().to_string(),
        name: d.get_str("name").to_string(),
        vpn_region_ids: d.get_string_list("vpn_region_ids"),
        internet_access: d.get_str("internet_access").to_string(),
        max_device: d.get_i64("max_device"),
        connect_auth: d.get_str("connect_auth").to_string(),
        system_subnets: d.get_string_list("system_subnets"),
    }
}

#[async_trait]
impl Resource<Meta> for UserGroupResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("vpn_region_ids", Attribute::list_of(ValueType::String).optional())
            .attr(
                "internet_access",
                Attribute::string()
                    .optional()
                    .default(INTERNET_ACCESS_LOCAL)
                    .one_of(&[
                        INTERNET_ACCESS_BLOCKED,
                        INTERNET_ACCESS_GLOBAL_INTERNET,
                        INTERNET_ACCESS_LOCAL,
                    ]),
            )
            .attr(
                "max_device",
                Attribute::int()
                    .optional()
                    .default(3)
                    .description("Maximum devices per user"),
            )
            .attr(
                "connect_auth",
                Attribute::string()
                    .optional()
                    .default(CONNECT_AUTH_AUTO)
                    .one_of(&[CONNECT_AUTH_AUTH, CONNECT_AUTH_AUTO, CONNECT_AUTH_STRICT_AUTH]),
            )
            .attr(
                "system_subnets",
                Attribute::list_of(ValueType::String).optional().computed(),
            )
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let created = client.create_user_group(&group_from_data(d)).await?;
        tracing::info!("Created user group {} ({})", created.name, created.id);
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let Some(group) = client.get_user_group_by_id(d.id()).await? else {
            tracing::warn!("User group {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("name", group.name);
        d.set("vpn_region_ids", non_empty(group.vpn_region_ids));
        d.set("internet_access", group.internet_access);
        d.set("max_device", group.max_device);
        d.set("connect_auth", group.connect_auth);
        d.set("system_subnets", group.system_subnets);
        Ok(())
    }

    async fn update(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.update_user_group(&group_from_data(d)).await?;
        self.read(client, d).await
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.delete_user_group(d.id()).await?;
        Ok(())
    }

    fn import(&self, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Ok(())
    }
}
