//! Managed resource types

mod connector;
mod dns_record;
mod host;
mod network;
mod route;
mod service;
mod user;
mod user_group;

pub use connector::ConnectorResource;
pub use dns_record::DnsRecordResource;
pub use host::HostResource;
pub use network::NetworkResource;
pub use route::RouteResource;
pub use service::ServiceResource;
pub(crate) use service::config_block as service_config_block;
pub use user::UserResource;
pub use user_group::UserGroupResource;
