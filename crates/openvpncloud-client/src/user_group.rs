//! User groups

use crate::client::Client;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const CONNECT_AUTH_AUTH: &str = "AUTH";
pub const CONNECT_AUTH_AUTO: &str = "AUTO";
pub const CONNECT_AUTH_STRICT_AUTH: &str = "STRICT_AUTH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserGroup {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub vpn_region_ids: Vec<String>,
    pub internet_access: String,
    pub max_device: i64,
    pub connect_auth: String,
    pub system_subnets: Vec<String>,
}

#[async_trait]
pub trait UserGroupApi: Send + Sync {
    async fn create_user_group(&self, group: &UserGroup) -> Result<UserGroup>;

    async fn get_user_group_by_id(&self, id: &str) -> Result<Option<UserGroup>>;

    async fn get_user_group(&self, name: &str) -> Result<Option<UserGroup>>;

    async fn list_user_groups(&self) -> Result<Vec<UserGroup>>;

    async fn update_user_group(&self, group: &UserGroup) -> Result<UserGroup>;

    async fn delete_user_group(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl UserGroupApi for Client {
    async fn create_user_group(&self, group: &UserGroup) -> Result<UserGroup> {
        tracing::debug!("Creating user group {}", group.name);
        self.send_json(self.request(Method::POST, "/user-groups").json(group))
            .await
    }

    async fn get_user_group_by_id(&self, id: &str) -> Result<Option<UserGroup>> {
        let groups = self.list_user_groups().await?;
        Ok(groups.into_iter().find(|g| g.id == id))
    }

    async fn get_user_group(&self, name: &str) -> Result<Option<UserGroup>> {
        let groups = self.list_user_groups().await?;
        Ok(groups.into_iter().find(|g| g.name == name))
    }

    async fn list_user_groups(&self) -> Result<Vec<UserGroup>> {
        self.get_all_pages("/user-groups", &[]).await
    }

    async fn update_user_group(&self, group: &UserGroup) -> Result<UserGroup> {
        self.send_json(
            self.request(Method::PUT, &format!("/user-groups/{}", group.id))
                .json(group),
        )
        .await
    }

    async fn delete_user_group(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/user-groups/{}", id)))
            .await
    }
}
