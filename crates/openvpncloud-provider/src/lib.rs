//! OpenVPN Cloud provider
//!
//! Declares the provider configuration, the `openvpncloud_*` resource types and
//! the `openvpncloud_*` data sources, all driven through [`CloudApi`].
//!
//! ```text
//! provider() ── configure(config) ──▶ ClientConfigurer ──▶ Arc<dyn CloudApi>
//!     │
//!     ├── resources:    network, connector, route, dns_record,
//!     │                 user, host, user_group, service
//!     └── data sources: network, connector, user, user_group,
//!                       vpn_region, network_routes, host, service
//! ```

pub mod data_sources;
pub mod flatten;
pub mod resources;

use async_trait::async_trait;
use openvpncloud_client::{CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR, Client, ClientConfig, CloudApi};
use openvpncloud_plugin::{Attribute, Configure, Diagnostics, Fields, Provider, ResourceData, Schema};
use std::sync::Arc;

/// Description applied when a configuration leaves it out
pub const DEFAULT_DESCRIPTION: &str = "Managed by Terraform";

/// Meta value handed to every resource and data source callback
pub type Meta = dyn CloudApi;

pub type CloudProvider = Provider<Meta>;

/// The full provider with every resource and data source registered
pub fn provider() -> CloudProvider {
    Provider::new(provider_schema(), ClientConfigurer)
        .resource("openvpncloud_network", resources::NetworkResource)
        .resource("openvpncloud_connector", resources::ConnectorResource)
        .resource("openvpncloud_route", resources::RouteResource)
        .resource("openvpncloud_dns_record", resources::DnsRecordResource)
        .resource("openvpncloud_user", resources::UserResource)
        .resource("openvpncloud_host", resources::HostResource)
        .resource("openvpncloud_user_group", resources::UserGroupResource)
        .resource("openvpncloud_service", resources::ServiceResource)
        .data_source("openvpncloud_network", data_sources::NetworkDataSource)
        .data_source("openvpncloud_connector", data_sources::ConnectorDataSource)
        .data_source("openvpncloud_user", data_sources::UserDataSource)
        .data_source("openvpncloud_user_group", data_sources::UserGroupDataSource)
        .data_source("openvpncloud_vpn_region", data_sources::VpnRegionDataSource)
        .data_source("openvpncloud_network_routes", data_sources::NetworkRoutesDataSource)
        .data_source("openvpncloud_host", data_sources::HostDataSource)
        .data_source("openvpncloud_service", data_sources::ServiceDataSource)
}

fn provider_schema() -> Schema {
    Schema::new()
        .attr(
            "client_id",
            Attribute::string()
                .optional()
                .sensitive()
                .env_default(CLIENT_ID_ENV_VAR)
                .description("API client id"),
        )
        .attr(
            "client_secret",
            Attribute::string()
                .optional()
                .sensitive()
                .env_default(CLIENT_SECRET_ENV_VAR)
                .description("API client secret"),
        )
        .attr(
            "base_url",
            Attribute::string()
                .required()
                .description("Cloud API URL, e.g. https://<tenant>.api.openvpn.com"),
        )
}

/// Builds an authenticated [`Client`] from provider configuration
pub struct ClientConfigurer;

#[async_trait]
impl Configure<Meta> for ClientConfigurer {
    async fn configure(&self, d: &ResourceData) -> Result<Arc<Meta>, Diagnostics> {
        let config = ClientConfig::new(
            d.get_str("base_url"),
            d.get_str("client_id"),
            d.get_str("client_secret"),
        );

        match Client::connect(config).await {
            Ok(client) => {
                let client: Arc<Meta> = Arc::new(client);
                Ok(client)
            }
            Err(e) => Err(Diagnostics::error(
                "Unable to create client",
                format!("Error: {}", e),
            )),
        }
    }
}
