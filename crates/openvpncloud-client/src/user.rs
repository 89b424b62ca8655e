//! Users and their devices

use crate::client::Client;
use crate::error::{OptionalExt, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MEMBER: &str = "MEMBER";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub ip_v4_address: String,
    pub ip_v6_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub username: String,
    pub role: String,
    pub email: String,
    pub auth_type: String,
    pub first_name: String,
    pub last_name: String,
    pub group_id: String,
    pub status: String,
    pub devices: Vec<Device>,
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User>;

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Look a user up by username and role
    async fn get_user(&self, username: &str, role: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn update_user(&self, user: &User) -> Result<User>;

    async fn delete_user(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl UserApi for Client {
    async fn create_user(&self, user: &User) -> Result<User> {
        tracing::debug!("Creating user {}", user.username);
        self.send_json(self.request(Method::POST, "/users").json(user))
            .await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.send_json::<User>(self.request(Method::GET, &format!("/users/{}", id)))
            .await
            .optional()
    }

    async fn get_user(&self, username: &str, role: &str) -> Result<Option<User>> {
        let users = self.list_users().await?;
        Ok(users
            .into_iter()
            .find(|u| u.username == username && u.role == role))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_all_pages("/users", &[]).await
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        self.send_json(self.request(Method::PUT, &format!("/users/{}", user.id)).json(user))
            .await
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/users/{}", id)))
            .await
    }
}
