//! `openvpncloud_user`

use crate::flatten::{device_from_block, device_to_value, non_empty};
use crate::{DEFAULT_DESCRIPTION, Meta};
use async_trait::async_trait;
use openvpncloud_client::{ROLE_ADMIN, ROLE_MEMBER, User, UserApi};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema};
use serde_json::Value;

pub struct UserResource;

fn device_block() -> Schema {
    Schema::new()
        .attr("id", Attribute::string().computed())
        .attr("name", Attribute::string().required())
        .attr(
            "description",
            Attribute::string().optional().default(DEFAULT_DESCRIPTION),
        )
        .attr("ipv4_address", Attribute::string().optional().computed())
        .attr("ipv6_address", Attribute::string().optional().computed())
}

fn user_from_data(d: &ResourceData) -> User {
    User {
        id: d.id().to_string(),
        username: d.get_str("username").to_string(),
        email: d.get_str("email").to_string(),
        first_name: d.get_str("first_name").to_string(),
        last_name: d.get_str("last_name").to_string(),
        group_id: d.get_str("group_id").to_string(),
        role: d.get_str("role").to_string(),
        devices: d.get_blocks("devices").iter().map(device_from_block).collect(),
        ..Default::default()
    }
}

#[async_trait]
impl Resource<Meta> for UserResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("username", Attribute::string().required().force_new())
            .attr("email", Attribute::string().required())
            .attr("first_name", Attribute::string().required())
            .attr("last_name", Attribute::string().required())
            .attr("group_id", Attribute::string().optional().computed())
            .attr(
                "role",
                Attribute::string()
                    .optional()
                    .default(ROLE_MEMBER)
                    .one_of(&[ROLE_ADMIN, ROLE_MEMBER]),
            )
            .attr(
                "devices",
                Attribute::list_of_blocks(device_block())
                    .optional()
                    .force_new()
                    .max_items(1),
            )
            .attr("status", Attribute::string().computed())
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let created = client.create_user(&user_from_data(d)).await?;
        tracing::info!("Created user {} ({})", created.username, created.id);
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let Some(user) = client.get_user_by_id(d.id()).await? else {
            tracing::warn!("User {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("username", user.username);
        d.set("email", user.email);
        d.set("first_name", user.first_name);
        d.set("last_name", user.last_name);
        d.set("group_id", user.group_id);
        d.set("role", user.role);
        d.set("status", user.status);
        let devices: Vec<Value> = user.devices.iter().map(device_to_value).collect();
        d.set("devices", non_empty(devices));
        Ok(())
    }

    async fn update(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        if d.has_changes(&["email", "first_name", "last_name", "group_id", "role"]) {
            client.update_user(&user_from_data(d)).await?;
        }
        self.read(client, d).await
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.delete_user(d.id()).await?;
        Ok(())
    }

    fn import(&self, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Ok(())
    }
}
