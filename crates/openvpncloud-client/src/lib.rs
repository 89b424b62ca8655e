//! OpenVPN Cloud REST API client
//!
//! Typed access to the OpenVPN Cloud beta API: networks, connectors, routes,
//! DNS records, users, hosts, user groups, services and VPN regions.
//!
//! Each API area is its own async trait implemented by [`Client`]. The
//! [`CloudApi`] umbrella trait bundles them so callers can hold a single
//! `Arc<dyn CloudApi>` and substitute an in-memory implementation in tests.
//!
//! # Requirements
//!
//! - An API client id/secret pair created in the OpenVPN Cloud admin portal
//! - `OPENVPN_CLOUD_BASE_URL`, `OPENVPN_CLOUD_CLIENT_ID`,
//!   `OPENVPN_CLOUD_CLIENT_SECRET` env vars when using [`ClientConfig::from_env`]
//!
//! # Example
//!
//! ```ignore
//! use openvpncloud_client::{Client, ClientConfig, NetworkApi};
//!
//! let client = Client::connect(ClientConfig::from_env()?).await?;
//!
//! for network in client.list_networks().await? {
//!     println!("{} ({} connectors)", network.name, network.connectors.len());
//! }
//! ```

pub mod client;
pub mod connector;
pub mod dns_record;
pub mod error;
pub mod host;
pub mod network;
pub mod route;
pub mod service;
pub mod user;
pub mod user_group;
pub mod vpn_region;

pub use client::{
    BASE_URL_ENV_VAR, CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR, Client, ClientConfig,
};
pub use connector::{Connector, ConnectorApi, NETWORK_ITEM_TYPE_HOST, NETWORK_ITEM_TYPE_NETWORK};
pub use dns_record::{DnsRecord, DnsRecordApi};
pub use error::{ClientError, OptionalExt, Result};
pub use host::{Host, HostApi};
pub use network::{
    INTERNET_ACCESS_BLOCKED, INTERNET_ACCESS_GLOBAL_INTERNET, INTERNET_ACCESS_LOCAL, Network, NetworkApi,
};
pub use route::{ROUTE_TYPE_DOMAIN, ROUTE_TYPE_IP_V4, ROUTE_TYPE_IP_V6, Route, RouteApi};
pub use service::{
    CustomServiceType, SERVICE_TYPE_DESTINATION, SERVICE_TYPE_IP_SOURCE, SERVICE_TYPES, Service,
    ServiceApi, ServiceConfig, ServiceRoute,
};
pub use user::{Device, ROLE_ADMIN, ROLE_MEMBER, User, UserApi};
pub use user_group::{
    CONNECT_AUTH_AUTH, CONNECT_AUTH_AUTO, CONNECT_AUTH_STRICT_AUTH, UserGroup, UserGroupApi,
};
pub use vpn_region::{VpnRegion, VpnRegionApi};

/// Every API area in one object-safe trait
pub trait CloudApi:
    NetworkApi
    + ConnectorApi
    + RouteApi
    + DnsRecordApi
    + UserApi
    + HostApi
    + UserGroupApi
    + ServiceApi
    + VpnRegionApi
{
}

impl<T> CloudApi for T where
    T: NetworkApi
        + ConnectorApi
        + RouteApi
        + DnsRecordApi
        + UserApi
        + HostApi
        + UserGroupApi
        + ServiceApi
        + VpnRegionApi
{
}
