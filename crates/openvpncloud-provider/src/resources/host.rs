//! `openvpncloud_host`
//!
//! Connectors are a set keyed by name: renaming one or moving it to another
//! region removes the old connector and adds a new one.

use crate::flatten::{connector_from_block, connector_to_value};
use crate::{DEFAULT_DESCRIPTION, Meta};
use async_trait::async_trait;
use openvpncloud_client::{
    Connector, ConnectorApi, Host, HostApi, INTERNET_ACCESS_BLOCKED, INTERNET_ACCESS_GLOBAL_INTERNET,
    INTERNET_ACCESS_LOCAL, NETWORK_ITEM_TYPE_HOST,
};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema, ValueType};
use serde_json::Value;
use std::collections::BTreeMap;

pub struct HostResource;

fn connector_block() -> Schema {
    Schema::new()
        .attr("id", Attribute::string().computed())
        .attr("name", Attribute::string().required())
        .attr("vpn_region_id", Attribute::string().required())
        .attr(
            "description",
            Attribute::string().optional().default(DEFAULT_DESCRIPTION),
        )
        .attr("ip_v4_address", Attribute::string().computed())
        .attr("ip_v6_address", Attribute::string().computed())
        .attr("network_item_id", Attribute::string().computed())
        .attr("network_item_type", Attribute::string().computed())
}

fn host_from_data(d: &ResourceData) -> Host {
    Host {
        id: d.id().to_string(),
        name: d.get_str("name").to_string(),
        description: d.get_str("description").to_string(),
        domain: d.get_str("domain").to_string(),
        internet_access: d.get_str("internet_access").to_string(),
        ..Default::default()
    }
}

/// Configured connector fields, keyed by connector name
#[derive(Debug)]
struct Wanted {
    id: String,
    vpn_region_id: String,
    description: String,
}

fn connectors_by_name(fields: &impl Fields) -> BTreeMap<String, Wanted> {
    fields
        .get_blocks("connector")
        .iter()
        .map(|b| {
            (
                b.get_str("name").to_string(),
                Wanted {
                    id: b.get_str("id").to_string(),
                    vpn_region_id: b.get_str("vpn_region_id").to_string(),
                    description: b.get_str("description").to_string(),
                },
            )
        })
        .collect()
}

#[async_trait]
impl Resource<Meta> for HostResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr(
                "description",
                Attribute::string().optional().default(DEFAULT_DESCRIPTION),
            )
            .attr("domain", Attribute::string().optional().computed())
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
            .attr("system_subnets", Attribute::set_of(ValueType::String).computed())
            .attr(
                "connector",
                Attribute::set_of_blocks(connector_block()).required().min_items(1),
            )
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let mut host = host_from_data(d);
        host.connectors = d
            .get_blocks("connector")
            .iter()
            .map(|b| connector_from_block(b, NETWORK_ITEM_TYPE_HOST))
            .collect();

        let created = client.create_host(&host).await?;
        tracing::info!("Created host {} ({})", created.name, created.id);
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let Some(host) = client.get_host_by_id(d.id()).await? else {
            tracing::warn!("Host {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("name", host.name);
        d.set("description", host.description);
        d.set("domain", host.domain);
        d.set("internet_access", host.internet_access);
        d.set("system_subnets", host.system_subnets);

        let connectors: Vec<Value> = host.connectors.iter().map(connector_to_value).collect();
        d.set("connector", connectors);
        Ok(())
    }

    async fn update(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let host_id = d.id().to_string();

        if d.has_change("connector") {
            let old = d.prior().map(|p| connectors_by_name(&p)).unwrap_or_default();
            let new = connectors_by_name(&*d);

            for (name, wanted) in &old {
                let kept = new.get(name).is_some_and(|n| {
                    n.vpn_region_id == wanted.vpn_region_id && n.description == wanted.description
                });
                if !kept && !wanted.id.is_empty() {
                    client
                        .delete_connector(&wanted.id, &host_id, NETWORK_ITEM_TYPE_HOST)
                        .await?;
                    tracing::info!("Removed connector {} from host {}", name, host_id);
                }
            }

            for (name, wanted) in &new {
                let existing = old.get(name).is_some_and(|o| {
                    o.vpn_region_id == wanted.vpn_region_id && o.description == wanted.description
                });
                if !existing {
                    let connector = Connector {
                        name: name.clone(),
                        vpn_region_id: wanted.vpn_region_id.clone(),
                        description: wanted.description.clone(),
                        network_item_type: NETWORK_ITEM_TYPE_HOST.to_string(),
                        ..Default::default()
                    };
                    client.add_connector(&connector, &host_id).await?;
                    tracing::info!("Added connector {} to host {}", name, host_id);
                }
            }
        }

        if d.has_changes(&["name", "description", "domain", "internet_access"]) {
            client.update_host(&host_from_data(d)).await?;
        }

        self.read(client, d).await
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.delete_host(d.id()).await?;
        Ok(())
    }

    fn import(&self, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Ok(())
    }
}
