//! Provider registry and lifecycle dispatch
//!
//! A [`Provider`] declares its configuration schema and the resource and data
//! source types it serves. [`Provider::configure`] runs the configure step and
//! returns a [`ConfiguredProvider`] that drives callbacks with the resulting
//! meta value.

use crate::data::ResourceData;
use crate::diag::Diagnostics;
use crate::resource::{Configure, DataSource, Resource};
use crate::schema::Schema;
use crate::state::ResourceState;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Provider declaration
pub struct Provider<M: ?Sized + Send + Sync> {
    schema: Schema,
    resources: BTreeMap<String, Box<dyn Resource<M>>>,
    data_sources: BTreeMap<String, Box<dyn DataSource<M>>>,
    configurer: Box<dyn Configure<M>>,
}

/// Serializable dump of every schema a provider declares
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resource_schemas: BTreeMap<String, Schema>,
    pub data_source_schemas: BTreeMap<String, Schema>,
}

impl<M: ?Sized + Send + Sync + 'static> Provider<M> {
    pub fn new(schema: Schema, configurer: impl Configure<M> + 'static) -> Self {
        Self {
            schema,
            resources: BTreeMap::new(),
            data_sources: BTreeMap::new(),
            configurer: Box::new(configurer),
        }
    }

    /// Register a resource type
    pub fn resource(mut self, type_name: impl Into<String>, resource: impl Resource<M> + 'static) -> Self {
        self.resources.insert(type_name.into(), Box::new(resource));
        self
    }

    /// Register a data source type
    pub fn data_source(
        mut self,
        type_name: impl Into<String>,
        data_source: impl DataSource<M> + 'static,
    ) -> Self {
        self.data_sources.insert(type_name.into(), Box::new(data_source));
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    pub fn resource_schema(&self, type_name: &str) -> Option<Schema> {
        self.resources.get(type_name).map(|r| r.schema())
    }

    pub fn data_source_schema(&self, type_name: &str) -> Option<Schema> {
        self.data_sources.get(type_name).map(|d| d.schema())
    }

    pub fn schema_document(&self) -> ProviderSchema {
        ProviderSchema {
            provider: self.schema.clone(),
            resource_schemas: self
                .resources
                .iter()
                .map(|(name, r)| (name.clone(), r.schema()))
                .collect(),
            data_source_schemas: self
                .data_sources
                .iter()
                .map(|(name, d)| (name.clone(), d.schema()))
                .collect(),
        }
    }

    /// Validate provider configuration and run the configure step
    pub async fn configure(
        &self,
        mut config: Map<String, Value>,
    ) -> Result<ConfiguredProvider<'_, M>, Diagnostics> {
        self.schema.apply_defaults(&mut config);
        self.schema.validate(&config).into_result()?;

        let d = ResourceData::new(config);
        let meta = self.configurer.configure(&d).await?;
        tracing::debug!("Provider configured");
        Ok(self.with_meta(meta))
    }

    /// Bind an already constructed meta value, skipping the configure step
    pub fn with_meta(&self, meta: Arc<M>) -> ConfiguredProvider<'_, M> {
        ConfiguredProvider {
            provider: self,
            meta,
        }
    }

    fn lookup_resource(&self, type_name: &str) -> Result<&dyn Resource<M>, Diagnostics> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| {
                Diagnostics::error(
                    "Invalid resource type",
                    format!("The provider does not support resource type \"{}\".", type_name),
                )
            })
    }

    fn lookup_data_source(&self, type_name: &str) -> Result<&dyn DataSource<M>, Diagnostics> {
        self.data_sources
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| {
                Diagnostics::error(
                    "Invalid data source",
                    format!("The provider does not support data source \"{}\".", type_name),
                )
            })
    }
}

/// Failed create or update
///
/// `partial` is set when the remote object exists despite the failure; its
/// attributes are as fresh as a follow-up read could make them.
#[derive(Debug)]
pub struct ApplyError {
    pub partial: Option<ResourceState>,
    pub diagnostics: Diagnostics,
}

impl From<Diagnostics> for ApplyError {
    fn from(diagnostics: Diagnostics) -> Self {
        Self {
            partial: None,
            diagnostics,
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostics)
    }
}

/// Provider bound to its configured meta value
pub struct ConfiguredProvider<'a, M: ?Sized + Send + Sync> {
    provider: &'a Provider<M>,
    meta: Arc<M>,
}

impl<M: ?Sized + Send + Sync + 'static> ConfiguredProvider<'_, M> {
    pub fn meta(&self) -> &M {
        self.meta.as_ref()
    }

    /// Create a new remote object from configuration
    ///
    /// When the callback fails after the object was created remotely, the
    /// error carries the object's state so the host can keep tracking it.
    pub async fn create(
        &self,
        type_name: &str,
        mut config: Map<String, Value>,
    ) -> Result<ResourceState, ApplyError> {
        let resource = self.provider.lookup_resource(type_name)?;
        let schema = resource.schema();
        schema.apply_defaults(&mut config);
        schema.validate(&config).into_result()?;

        let mut d = ResourceData::new(config);
        if let Err(diagnostics) = resource.create(self.meta(), &mut d).await {
            let partial = if self.recover(resource, &mut d).await {
                Some(ResourceState::from_data(type_name, d))
            } else {
                None
            };
            return Err(ApplyError {
                partial,
                diagnostics,
            });
        }

        if !d.has_id() {
            return Err(Diagnostics::error(
                "Provider produced inconsistent result after apply",
                format!("Creating {} returned no id.", type_name),
            )
            .into());
        }
        tracing::info!("Created {} {}", type_name, d.id());
        Ok(ResourceState::from_data(type_name, d))
    }

    /// Refresh a recorded object; `None` means it no longer exists remotely
    pub async fn read(&self, state: &ResourceState) -> Result<Option<ResourceState>, Diagnostics> {
        let resource = self.provider.lookup_resource(&state.resource_type)?;

        let mut d = ResourceData::from_state(&state.id, state.attributes.clone());
        resource.read(self.meta(), &mut d).await?;

        if !d.has_id() {
            tracing::warn!(
                "{} {} no longer exists, removing from state",
                state.resource_type,
                state.id
            );
            return Ok(None);
        }
        Ok(Some(state.refreshed(d)))
    }

    /// Update a recorded object in place
    pub async fn update(
        &self,
        state: &ResourceState,
        mut config: Map<String, Value>,
    ) -> Result<ResourceState, ApplyError> {
        let resource = self.provider.lookup_resource(&state.resource_type)?;
        let schema = resource.schema();
        schema.apply_defaults(&mut config);
        schema.validate(&config).into_result()?;

        let merged = schema.merge_for_update(&state.attributes, &config);
        let replace = schema.force_new_changes(&state.attributes, &merged);
        if !replace.is_empty() {
            return Err(Diagnostics::error(
                "Resource requires replacement",
                format!(
                    "Changing {} forces a new {}; destroy and recreate it.",
                    replace.join(", "),
                    state.resource_type
                ),
            )
            .into());
        }

        if same_values(&merged, &state.attributes) {
            tracing::debug!("{} {} is up to date", state.resource_type, state.id);
            return Ok(state.clone());
        }

        let mut d = ResourceData::for_update(&state.id, state.attributes.clone(), merged);
        if let Err(diagnostics) = resource.update(self.meta(), &mut d).await {
            let partial = if self.recover(resource, &mut d).await {
                Some(state.refreshed(d))
            } else {
                None
            };
            return Err(ApplyError {
                partial,
                diagnostics,
            });
        }
        tracing::info!("Updated {} {}", state.resource_type, state.id);
        Ok(state.refreshed(d))
    }

    /// Re-read an object whose create or update callback failed part way
    ///
    /// Returns whether `d` still names a remote object. A failing read is
    /// logged and leaves `d` as the callback left it.
    async fn recover(&self, resource: &dyn Resource<M>, d: &mut ResourceData) -> bool {
        if !d.has_id() {
            return false;
        }
        if let Err(diags) = resource.read(self.meta(), d).await {
            tracing::warn!("Could not re-read {} after a failed apply: {}", d.id(), diags);
        }
        d.has_id()
    }

    /// Delete a recorded object
    pub async fn delete(&self, state: &ResourceState) -> Result<(), Diagnostics> {
        let resource = self.provider.lookup_resource(&state.resource_type)?;

        let mut d = ResourceData::from_state(&state.id, state.attributes.clone());
        resource.delete(self.meta(), &mut d).await?;
        tracing::info!("Deleted {} {}", state.resource_type, state.id);
        Ok(())
    }

    /// Adopt an existing remote object by its import id
    pub async fn import(&self, type_name: &str, id: &str) -> Result<ResourceState, Diagnostics> {
        let resource = self.provider.lookup_resource(type_name)?;

        let mut d = ResourceData::from_state(id, Map::new());
        resource.import(&mut d)?;
        resource.read(self.meta(), &mut d).await?;

        if !d.has_id() {
            return Err(Diagnostics::error(
                "Cannot import non-existent remote object",
                format!("No {} with id \"{}\" was found.", type_name, id),
            ));
        }
        tracing::info!("Imported {} {}", type_name, d.id());
        Ok(ResourceState::from_data(type_name, d))
    }

    /// Run a data source lookup
    pub async fn read_data(
        &self,
        type_name: &str,
        mut config: Map<String, Value>,
    ) -> Result<ResourceState, Diagnostics> {
        let data_source = self.provider.lookup_data_source(type_name)?;
        let schema = data_source.schema();
        schema.apply_defaults(&mut config);
        schema.validate(&config).into_result()?;

        let mut d = ResourceData::new(config);
        data_source.read(self.meta(), &mut d).await?;
        Ok(ResourceState::from_data(type_name, d))
    }
}

/// Attribute maps equal once null values are treated as absent
fn same_values(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    let present = |m: &Map<String, Value>| m.iter().filter(|(_, v)| !v.is_null()).count();
    present(a) == present(b)
        && a
            .iter()
            .filter(|(_, v)| !v.is_null())
            .all(|(k, v)| b.get(k) == Some(v))
}
