//! Routes published by a network

use crate::client::Client;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const ROUTE_TYPE_IP_V4: &str = "IP_V4";
pub const ROUTE_TYPE_IP_V6: &str = "IP_V6";
pub const ROUTE_TYPE_DOMAIN: &str = "DOMAIN";

/// A route; IP routes carry `subnet`, domain routes carry `domain`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type")]
    pub route_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subnet: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_item_id: String,
}

impl Route {
    /// Build a route from its type and value
    pub fn new(route_type: impl Into<String>, value: impl Into<String>) -> Self {
        let route_type = route_type.into();
        let value = value.into();
        let mut route = Self {
            route_type,
            ..Default::default()
        };
        route.set_value(value);
        route
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Subnet or domain, depending on the route type
    pub fn value(&self) -> &str {
        if self.route_type == ROUTE_TYPE_DOMAIN {
            &self.domain
        } else {
            &self.subnet
        }
    }

    pub fn set_value(&mut self, value: String) {
        if self.route_type == ROUTE_TYPE_DOMAIN {
            self.domain = value;
            self.subnet.clear();
        } else {
            self.subnet = value;
            self.domain.clear();
        }
    }
}

#[async_trait]
pub trait RouteApi: Send + Sync {
    async fn create_route(&self, network_id: &str, route: &Route) -> Result<Route>;

    async fn list_network_routes(&self, network_id: &str) -> Result<Vec<Route>>;

    async fn get_network_route(&self, network_id: &str, route_id: &str) -> Result<Option<Route>>;

    async fn update_route(&self, network_id: &str, route: &Route) -> Result<Route>;

    async fn delete_route(&self, network_id: &str, route_id: &str) -> Result<()>;
}

#[async_trait]
impl RouteApi for Client {
    async fn create_route(&self, network_id: &str, route: &Route) -> Result<Route> {
        tracing::debug!("Creating {} route {} in {}", route.route_type, route.value(), network_id);
        let builder = self
            .request(Method::POST, &format!("/networks/{}/routes", network_id))
            .json(route);
        self.send_json(builder).await
    }

    async fn list_network_routes(&self, network_id: &str) -> Result<Vec<Route>> {
        self.get_all_pages(&format!("/networks/{}/routes", network_id), &[])
            .await
    }

    async fn get_network_route(&self, network_id: &str, route_id: &str) -> Result<Option<Route>> {
        let routes = self.list_network_routes(network_id).await?;
        Ok(routes.into_iter().find(|r| r.id == route_id))
    }

    async fn update_route(&self, network_id: &str, route: &Route) -> Result<Route> {
        let builder = self
            .request(
                Method::PUT,
                &format!("/networks/{}/routes/{}", network_id, route.id),
            )
            .json(route);
        self.send_json(builder).await
    }

    async fn delete_route(&self, network_id: &str, route_id: &str) -> Result<()> {
        self.send_empty(self.request(
            Method::DELETE,
            &format!("/networks/{}/routes/{}", network_id, route_id),
        ))
        .await
    }
}
