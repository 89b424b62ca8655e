//! `openvpncloud_dns_record`

use crate::flatten::non_empty;
use crate::{DEFAULT_DESCRIPTION, Meta};
use async_trait::async_trait;
use openvpncloud_client::{DnsRecord, DnsRecordApi};
use openvpncloud_plugin::{Attribute, Diagnostics, Fields, Resource, ResourceData, Schema, ValueType};

pub struct DnsRecordResource;

fn record_from_data(d: &ResourceData) -> DnsRecord {
    DnsRecord {
        id: d.id().to_string(),
        domain: d.get_str("domain").to_string(),
        description: d.get_str("description").to_string(),
        ipv4_addresses: d.get_string_list("ip_v4_addresses"),
        ipv6_addresses: d.get_string_list("ip_v6_addresses"),
    }
}

#[async_trait]
impl Resource<Meta> for DnsRecordResource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain", Attribute::string().required())
            .attr(
                "description",
                Attribute::string().optional().default(DEFAULT_DESCRIPTION),
            )
            .attr("ip_v4_addresses", Attribute::list_of(ValueType::String).optional())
            .attr("ip_v6_addresses", Attribute::list_of(ValueType::String).optional())
    }

    async fn create(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let created = client.create_dns_record(&record_from_data(d)).await?;
        tracing::info!("Created DNS record {} ({})", created.domain, created.id);
        d.set_id(created.id);

        self.read(client, d).await
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let Some(record) = client.get_dns_record(d.id()).await? else {
            tracing::warn!("DNS record {} not found, removing from state", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set("domain", record.domain);
        d.set("description", record.description);
        d.set("ip_v4_addresses", non_empty(record.ipv4_addresses));
        d.set("ip_v6_addresses", non_empty(record.ipv6_addresses));
        Ok(())
    }

    async fn update(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.update_dns_record(&record_from_data(d)).await?;
        self.read(client, d).await
    }

    async fn delete(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        client.delete_dns_record(d.id()).await?;
        Ok(())
    }

    fn import(&self, _d: &mut ResourceData) -> Result<(), Diagnostics> {
        Ok(())
    }
}
