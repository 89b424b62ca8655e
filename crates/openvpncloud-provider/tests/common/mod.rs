use async_trait::async_trait;
use openvpncloud_client::{
    ClientError, Connector, ConnectorApi, DnsRecord, DnsRecordApi, Host, HostApi,
    NETWORK_ITEM_TYPE_HOST, NETWORK_ITEM_TYPE_NETWORK, Network, NetworkApi, Result, Route,
    RouteApi, Service, ServiceApi, User, UserApi, UserGroup, UserGroupApi, VpnRegion, VpnRegionApi,
};
use openvpncloud_provider::{CloudProvider, Meta};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the OpenVPN Cloud API
pub struct FakeCloud {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u32,
    calls: Vec<String>,
    networks: BTreeMap<String, Network>,
    hosts: BTreeMap<String, Host>,
    dns_records: BTreeMap<String, DnsRecord>,
    users: BTreeMap<String, User>,
    user_groups: BTreeMap<String, UserGroup>,
    services: BTreeMap<String, Service>,
    regions: Vec<VpnRegion>,
    failures: BTreeMap<String, u32>,
}

impl Inner {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn record(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }

    /// Consume one armed failure for `call`
    fn check(&mut self, call: &str) -> Result<()> {
        match self.failures.get_mut(call) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Err(ClientError::Api {
                    status: 503,
                    message: format!("{} unavailable", call),
                })
            }
            _ => Ok(()),
        }
    }

    fn provision_connector(&mut self, mut connector: Connector, item_id: &str) -> Connector {
        connector.id = self.id("conn");
        connector.network_item_id = item_id.to_string();
        connector.ip_v4_address = format!("100.96.1.{}", self.next_id);
        connector.ip_v6_address = format!("fd:0:0:8000::{}", self.next_id);
        connector
    }

    fn provision_route(&mut self, mut route: Route, network_id: &str) -> Route {
        route.id = self.id("route");
        route.network_item_id = network_id.to_string();
        route
    }

    fn all_connectors(&self) -> Vec<Connector> {
        self.networks
            .values()
            .flat_map(|n| n.connectors.clone())
            .chain(self.hosts.values().flat_map(|h| h.connectors.clone()))
            .collect()
    }
}

fn not_found(what: &str, id: &str) -> ClientError {
    ClientError::NotFound(format!("{} {}", what, id))
}

#[allow(dead_code)]
impl FakeCloud {
    pub fn new() -> Self {
        let inner = Inner {
            regions: vec![
                VpnRegion {
                    id: "eu-central-1".to_string(),
                    continent: "Europe".to_string(),
                    country: "Germany".to_string(),
                    country_iso: "DE".to_string(),
                    region_name: "Frankfurt".to_string(),
                },
                VpnRegion {
                    id: "us-west-1".to_string(),
                    continent: "North America".to_string(),
                    country: "United States".to_string(),
                    country_iso: "US".to_string(),
                    region_name: "San Francisco".to_string(),
                },
            ],
            ..Default::default()
        };
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Mutating calls in the order they were made, e.g. `add_connector conn-3`
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn network(&self, id: &str) -> Option<Network> {
        self.inner.lock().unwrap().networks.get(id).cloned()
    }

    pub fn host(&self, id: &str) -> Option<Host> {
        self.inner.lock().unwrap().hosts.get(id).cloned()
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.inner.lock().unwrap().users.get(id).cloned()
    }

    /// Make the next `times` calls of `call` (a method name) fail with a 503
    pub fn fail(&self, call: &str, times: u32) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .insert(call.to_string(), times);
    }

    /// Change a user behind the provider's back
    pub fn edit_user(&self, id: &str, edit: impl FnOnce(&mut User)) {
        if let Some(user) = self.inner.lock().unwrap().users.get_mut(id) {
            edit(user);
        }
    }

    pub fn edit_user_group(&self, id: &str, edit: impl FnOnce(&mut UserGroup)) {
        if let Some(group) = self.inner.lock().unwrap().user_groups.get_mut(id) {
            edit(group);
        }
    }

    /// Remove a network behind the provider's back
    pub fn forget_network(&self, id: &str) {
        self.inner.lock().unwrap().networks.remove(id);
    }
}

#[async_trait]
impl NetworkApi for FakeCloud {
    async fn create_network(&self, network: &Network) -> Result<Network> {
        let mut inner = self.inner.lock().unwrap();
        let mut network = network.clone();
        network.id = inner.id("net");
        network.system_subnets = vec!["100.96.0.0/11".to_string()];
        let net_id = network.id.clone();
        network.connectors = std::mem::take(&mut network.connectors)
            .into_iter()
            .map(|c| inner.provision_connector(c, &net_id))
            .collect();
        network.routes = std::mem::take(&mut network.routes)
            .into_iter()
            .map(|r| inner.provision_route(r, &net_id))
            .collect();
        inner.record(format!("create_network {}", net_id));
        inner.networks.insert(net_id, network.clone());
        Ok(network)
    }

    async fn get_network_by_id(&self, id: &str) -> Result<Option<Network>> {
        Ok(self.inner.lock().unwrap().networks.get(id).cloned())
    }

    async fn get_network_by_name(&self, name: &str) -> Result<Option<Network>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.networks.values().find(|n| n.name == name).cloned())
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        Ok(self.inner.lock().unwrap().networks.values().cloned().collect())
    }

    async fn update_network(&self, network: &Network) -> Result<Network> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("update_network {}", network.id));
        let stored = inner
            .networks
            .get_mut(&network.id)
            .ok_or_else(|| not_found("network", &network.id))?;
        stored.name = network.name.clone();
        stored.description = network.description.clone();
        stored.egress = network.egress;
        stored.internet_access = network.internet_access.clone();
        Ok(stored.clone())
    }

    async fn delete_network(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("delete_network {}", id));
        inner
            .networks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("network", id))
    }
}

#[async_trait]
impl ConnectorApi for FakeCloud {
    async fn add_connector(&self, connector: &Connector, network_item_id: &str) -> Result<Connector> {
        let mut inner = self.inner.lock().unwrap();
        let connector = inner.provision_connector(connector.clone(), network_item_id);
        inner.record(format!("add_connector {}", connector.id));

        if connector.network_item_type == NETWORK_ITEM_TYPE_HOST {
            inner
                .hosts
                .get_mut(network_item_id)
                .ok_or_else(|| not_found("host", network_item_id))?
                .connectors
                .push(connector.clone());
        } else {
            inner
                .networks
                .get_mut(network_item_id)
                .ok_or_else(|| not_found("network", network_item_id))?
                .connectors
                .push(connector.clone());
        }
        Ok(connector)
    }

    async fn list_connectors(&self) -> Result<Vec<Connector>> {
        Ok(self.inner.lock().unwrap().all_connectors())
    }

    async fn get_connector_by_id(&self, id: &str) -> Result<Option<Connector>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.all_connectors().into_iter().find(|c| c.id == id))
    }

    async fn get_connector_by_name(&self, name: &str) -> Result<Option<Connector>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.all_connectors().into_iter().find(|c| c.name == name))
    }

    async fn delete_connector(
        &self,
        id: &str,
        network_item_id: &str,
        network_item_type: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check("delete_connector")?;
        inner.record(format!("delete_connector {}", id));

        let connectors = match network_item_type {
            NETWORK_ITEM_TYPE_NETWORK => inner
                .networks
                .get_mut(network_item_id)
                .map(|n| &mut n.connectors),
            _ => inner.hosts.get_mut(network_item_id).map(|h| &mut h.connectors),
        }
        .ok_or_else(|| not_found("network item", network_item_id))?;

        let before = connectors.len();
        connectors.retain(|c| c.id != id);
        if connectors.len() == before {
            return Err(not_found("connector", id));
        }
        Ok(())
    }

    async fn get_connector_profile(&self, id: &str) -> Result<String> {
        self.inner.lock().unwrap().check("get_connector_profile")?;
        Ok(format!("client\nremote {}.openvpn.example 1194\n", id))
    }
}

#[async_trait]
impl RouteApi for FakeCloud {
    async fn create_route(&self, network_id: &str, route: &Route) -> Result<Route> {
        let mut inner = self.inner.lock().unwrap();
        let route = inner.provision_route(route.clone(), network_id);
        inner.record(format!("create_route {}", route.id));
        inner
            .networks
            .get_mut(network_id)
            .ok_or_else(|| not_found("network", network_id))?
            .routes
            .push(route.clone());
        Ok(route)
    }

    async fn list_network_routes(&self, network_id: &str) -> Result<Vec<Route>> {
        let inner = self.inner.lock().unwrap();
        inner
            .networks
            .get(network_id)
            .map(|n| n.routes.clone())
            .ok_or_else(|| not_found("network", network_id))
    }

    async fn get_network_route(&self, network_id: &str, route_id: &str) -> Result<Option<Route>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .networks
            .get(network_id)
            .and_then(|n| n.routes.iter().find(|r| r.id == route_id).cloned()))
    }

    async fn update_route(&self, network_id: &str, route: &Route) -> Result<Route> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("update_route {}", route.id));
        let stored = inner
            .networks
            .get_mut(network_id)
            .and_then(|n| n.routes.iter_mut().find(|r| r.id == route.id))
            .ok_or_else(|| not_found("route", &route.id))?;
        stored.subnet = route.subnet.clone();
        stored.domain = route.domain.clone();
        stored.description = route.description.clone();
        Ok(stored.clone())
    }

    async fn delete_route(&self, network_id: &str, route_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("delete_route {}", route_id));
        let routes = &mut inner
            .networks
            .get_mut(network_id)
            .ok_or_else(|| not_found("network", network_id))?
            .routes;
        routes.retain(|r| r.id != route_id);
        Ok(())
    }
}

#[async_trait]
impl DnsRecordApi for FakeCloud {
    async fn create_dns_record(&self, record: &DnsRecord) -> Result<DnsRecord> {
        let mut inner = self.inner.lock().unwrap();
        let mut record = record.clone();
        record.id = inner.id("dns");
        inner.record(format!("create_dns_record {}", record.id));
        inner.dns_records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_dns_record(&self, id: &str) -> Result<Option<DnsRecord>> {
        Ok(self.inner.lock().unwrap().dns_records.get(id).cloned())
    }

    async fn list_dns_records(&self) -> Result<Vec<DnsRecord>> {
        Ok(self.inner.lock().unwrap().dns_records.values().cloned().collect())
    }

    async fn update_dns_record(&self, record: &DnsRecord) -> Result<DnsRecord> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("update_dns_record {}", record.id));
        let stored = inner
            .dns_records
            .get_mut(&record.id)
            .ok_or_else(|| not_found("dns record", &record.id))?;
        *stored = record.clone();
        Ok(record.clone())
    }

    async fn delete_dns_record(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("delete_dns_record {}", id));
        inner.dns_records.remove(id);
        Ok(())
    }
}

#[async_trait]
impl UserApi for FakeCloud {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut inner = self.inner.lock().unwrap();
        let mut user = user.clone();
        user.id = inner.id("user");
        user.auth_type = "LOCAL".to_string();
        user.status = "PENDING".to_string();
        if user.group_id.is_empty() {
            user.group_id = "grp-default".to_string();
        }
        for device in &mut user.devices {
            device.id = format!("dev-{}", user.id);
            if device.ip_v4_address.is_empty() {
                device.ip_v4_address = "100.96.64.2".to_string();
            }
            if device.ip_v6_address.is_empty() {
                device.ip_v6_address = "fd:0:0:8040::2".to_string();
            }
        }
        inner.record(format!("create_user {}", user.id));
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.inner.lock().unwrap().users.get(id).cloned())
    }

    async fn get_user(&self, username: &str, role: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username && u.role == role)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.inner.lock().unwrap().users.values().cloned().collect())
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("update_user {}", user.id));
        let stored = inner
            .users
            .get_mut(&user.id)
            .ok_or_else(|| not_found("user", &user.id))?;
        stored.email = user.email.clone();
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.role = user.role.clone();
        if !user.group_id.is_empty() {
            stored.group_id = user.group_id.clone();
        }
        Ok(stored.clone())
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("delete_user {}", id));
        inner.users.remove(id);
        Ok(())
    }
}

#[async_trait]
impl HostApi for FakeCloud {
    async fn create_host(&self, host: &Host) -> Result<Host> {
        let mut inner = self.inner.lock().unwrap();
        let mut host = host.clone();
        host.id = inner.id("host");
        host.system_subnets = vec!["100.96.128.0/17".to_string()];
        let host_id = host.id.clone();
        host.connectors = std::mem::take(&mut host.connectors)
            .into_iter()
            .map(|c| inner.provision_connector(c, &host_id))
            .collect();
        inner.record(format!("create_host {}", host_id));
        inner.hosts.insert(host_id, host.clone());
        Ok(host)
    }

    async fn get_host_by_id(&self, id: &str) -> Result<Option<Host>> {
        Ok(self.inner.lock().unwrap().hosts.get(id).cloned())
    }

    async fn get_host_by_name(&self, name: &str) -> Result<Option<Host>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.hosts.values().find(|h| h.name == name).cloned())
    }

    async fn list_hosts(&self) -> Result<Vec<Host>> {
        Ok(self.inner.lock().unwrap().hosts.values().cloned().collect())
    }

    async fn update_host(&self, host: &Host) -> Result<Host> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("update_host {}", host.id));
        let stored = inner
            .hosts
            .get_mut(&host.id)
            .ok_or_else(|| not_found("host", &host.id))?;
        stored.name = host.name.clone();
        stored.description = host.description.clone();
        stored.domain = host.domain.clone();
        stored.internet_access = host.internet_access.clone();
        Ok(stored.clone())
    }

    async fn delete_host(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("delete_host {}", id));
        inner.hosts.remove(id);
        Ok(())
    }
}

#[async_trait]
impl UserGroupApi for FakeCloud {
    async fn create_user_group(&self, group: &UserGroup) -> Result<UserGroup> {
        let mut inner = self.inner.lock().unwrap();
        let mut group = group.clone();
        group.id = inner.id("ug");
        if group.system_subnets.is_empty() {
            group.system_subnets = vec!["100.96.64.0/24".to_string()];
        }
        inner.record(format!("create_user_group {}", group.id));
        inner.user_groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    async fn get_user_group_by_id(&self, id: &str) -> Result<Option<UserGroup>> {
        Ok(self.inner.lock().unwrap().user_groups.get(id).cloned())
    }

    async fn get_user_group(&self, name: &str) -> Result<Option<UserGroup>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.user_groups.values().find(|g| g.name == name).cloned())
    }

    async fn list_user_groups(&self) -> Result<Vec<UserGroup>> {
        Ok(self.inner.lock().unwrap().user_groups.values().cloned().collect())
    }

    async fn update_user_group(&self, group: &UserGroup) -> Result<UserGroup> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("update_user_group {}", group.id));
        let stored = inner
            .user_groups
            .get_mut(&group.id)
            .ok_or_else(|| not_found("user group", &group.id))?;
        let system_subnets = if group.system_subnets.is_empty() {
            stored.system_subnets.clone()
        } else {
            group.system_subnets.clone()
        };
        *stored = UserGroup {
            system_subnets,
            ..group.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_user_group(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("delete_user_group {}", id));
        inner.user_groups.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ServiceApi for FakeCloud {
    async fn create_service(&self, service: &Service) -> Result<Service> {
        let mut inner = self.inner.lock().unwrap();
        let mut service = service.clone();
        service.id = inner.id("svc");
        inner.record(format!("create_service {}", service.id));
        inner.services.insert(service.id.clone(), service.clone());
        Ok(service)
    }

    async fn get_service(
        &self,
        id: &str,
        network_item_type: &str,
        network_item_id: &str,
    ) -> Result<Option<Service>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .services
            .get(id)
            .filter(|s| {
                s.network_item_type == network_item_type && s.network_item_id == network_item_id
            })
            .cloned())
    }

    async fn get_service_by_name(&self, name: &str) -> Result<Option<Service>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.services.values().find(|s| s.name == name).cloned())
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.inner.lock().unwrap().services.values().cloned().collect())
    }

    async fn update_service(&self, service: &Service) -> Result<Service> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("update_service {}", service.id));
        let stored = inner
            .services
            .get_mut(&service.id)
            .ok_or_else(|| not_found("service", &service.id))?;
        *stored = service.clone();
        Ok(service.clone())
    }

    async fn delete_service(
        &self,
        id: &str,
        _network_item_type: &str,
        _network_item_id: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(format!("delete_service {}", id));
        inner.services.remove(id);
        Ok(())
    }
}

#[async_trait]
impl VpnRegionApi for FakeCloud {
    async fn list_vpn_regions(&self) -> Result<Vec<VpnRegion>> {
        Ok(self.inner.lock().unwrap().regions.clone())
    }

    async fn get_vpn_region(&self, id: &str) -> Result<Option<VpnRegion>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.regions.iter().find(|r| r.id == id).cloned())
    }
}

/// Provider plus the fake it is bound to
pub struct TestCloud {
    pub provider: CloudProvider,
    pub fake: Arc<FakeCloud>,
}

#[allow(dead_code)]
impl TestCloud {
    pub fn new() -> Self {
        Self {
            provider: openvpncloud_provider::provider(),
            fake: Arc::new(FakeCloud::new()),
        }
    }

    pub fn meta(&self) -> Arc<Meta> {
        self.fake.clone()
    }
}

/// `json!` object literal as an attribute map
#[allow(dead_code)]
pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}
