//! `openvpncloud_user` data source

use super::not_found;
use crate::Meta;
use crate::flatten::device_to_value;
use async_trait::async_trait;
use openvpncloud_client::{ROLE_ADMIN, ROLE_MEMBER, UserApi};
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema};
use serde_json::Value;

pub struct UserDataSource;

#[async_trait]
impl DataSource<Meta> for UserDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("username", Attribute::string().required())
            .attr(
                "role",
                Attribute::string()
                    .optional()
                    .default(ROLE_MEMBER)
                    .one_of(&[ROLE_ADMIN, ROLE_MEMBER]),
            )
            .attr("user_id", Attribute::string().computed())
            .attr("email", Attribute::string().computed())
            .attr("auth_type", Attribute::string().computed())
            .attr("first_name", Attribute::string().computed())
            .attr("last_name", Attribute::string().computed())
            .attr("group_id", Attribute::string().computed())
            .attr("status", Attribute::string().computed())
            .attr(
                "devices",
                Attribute::list_of_blocks(
                    Schema::new()
                        .attr("id", Attribute::string().computed())
                        .attr("name", Attribute::string().computed())
                        .attr("description", Attribute::string().computed())
                        .attr("ipv4_address", Attribute::string().computed())
                        .attr("ipv6_address", Attribute::string().computed()),
                )
                .computed(),
            )
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let username = d.get_str("username").to_string();
        let role = d.get_str("role").to_string();
        let user = client
            .get_user(&username, &role)
            .await?
            .ok_or_else(|| not_found("User", &username))?;

        let devices: Vec<Value> = user.devices.iter().map(device_to_value).collect();

        d.set("user_id", user.id.clone());
        d.set("email", user.email);
        d.set("auth_type", user.auth_type);
        d.set("first_name", user.first_name);
        d.set("last_name", user.last_name);
        d.set("group_id", user.group_id);
        d.set("status", user.status);
        d.set("devices", devices);
        d.set_id(user.id);
        Ok(())
    }
}
