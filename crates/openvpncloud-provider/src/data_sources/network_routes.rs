//! `openvpncloud_network_routes` data source

use crate::Meta;
use async_trait::async_trait;
use openvpncloud_client::RouteApi;
use openvpncloud_plugin::{Attribute, DataSource, Diagnostics, Fields, ResourceData, Schema};
use serde_json::{Value, json};

pub struct NetworkRoutesDataSource;

#[async_trait]
impl DataSource<Meta> for NetworkRoutesDataSource {
    fn schema(&self) -> Schema {
        Schema::new()
            .attr("network_item_id", Attribute::string().required())
            .attr(
                "routes",
                Attribute::list_of_blocks(
                    Schema::new()
                        .attr("type", Attribute::string().computed())
                        .attr("value", Attribute::string().computed()),
                )
                .computed(),
            )
    }

    async fn read(&self, client: &Meta, d: &mut ResourceData) -> Result<(), Diagnostics> {
        let network_id = d.get_str("network_item_id").to_string();
        let routes = client.list_network_routes(&network_id).await?;

        let routes: Vec<Value> = routes
            .iter()
            .map(|r| json!({ "type": r.route_type, "value": r.value() }))
            .collect();
        d.set("routes", routes);
        d.set_id(network_id);
        Ok(())
    }
}
