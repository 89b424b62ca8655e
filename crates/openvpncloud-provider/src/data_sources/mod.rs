//! Read-only lookups of existing remote objects

mod connector;
mod host;
mod network;
mod network_routes;
mod service;
mod user;
mod user_group;
mod vpn_region;

pub use connector::ConnectorDataSource;
pub use host::HostDataSource;
pub use network::NetworkDataSource;
pub use network_routes::NetworkRoutesDataSource;
pub use service::ServiceDataSource;
pub use user::UserDataSource;
pub use user_group::UserGroupDataSource;
pub use vpn_region::VpnRegionDataSource;

use openvpncloud_plugin::{Attribute, Diagnostics, Schema};

/// Error reported when a lookup comes back empty
fn not_found(kind: &str, key: &str) -> Diagnostics {
    Diagnostics::error(
        format!("{} with name {} was not found", kind, key),
        "",
    )
}

/// Computed connector block as reported for networks and hosts
fn connector_block() -> Schema {
    Schema::new()
        .attr("id", Attribute::string().computed())
        .attr("name", Attribute::string().computed())
        .attr("description", Attribute::string().computed())
        .attr("vpn_region_id", Attribute::string().computed())
        .attr("network_item_id", Attribute::string().computed())
        .attr("network_item_type", Attribute::string().computed())
        .attr("ip_v4_address", Attribute::string().computed())
        .attr("ip_v6_address", Attribute::string().computed())
}
