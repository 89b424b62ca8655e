//! State management for provider-managed resources
//!
//! Manages the `.openvpncloud/state.json` file which records every resource
//! the host has created or imported, keyed by its `<type>.<name>` address.

use crate::data::ResourceData;
use crate::error::{PluginError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".openvpncloud";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const STATE_SCRATCH: &str = "state.json.new";
const LOCK_FILE: &str = "lock.json";
const LOCK_TTL_MINUTES: i64 = 60;

/// Address of a resource in configuration, e.g. `openvpncloud_network.main`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceAddress {
    pub resource_type: String,
    pub name: String,
}

impl FromStr for ResourceAddress {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((resource_type, name)) if !resource_type.is_empty() && !name.is_empty() => {
                Ok(Self {
                    resource_type: resource_type.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(PluginError::InvalidAddress(s.to_string())),
        }
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Everything the host manages in one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalState {
    /// On-disk format version
    pub version: u32,

    pub updated_at: DateTime<Utc>,

    /// Resources indexed by `<type>.<name>`
    pub resources: BTreeMap<String, ResourceState>,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resources: BTreeMap::new(),
        }
    }
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a resource
    pub fn set_resource(&mut self, address: &ResourceAddress, state: ResourceState) {
        self.resources.insert(address.to_string(), state);
        self.updated_at = Utc::now();
    }

    /// Remove a resource
    pub fn remove_resource(&mut self, address: &ResourceAddress) -> Option<ResourceState> {
        let result = self.resources.remove(&address.to_string());
        if result.is_some() {
            self.updated_at = Utc::now();
        }
        result
    }

    pub fn get_resource(&self, address: &ResourceAddress) -> Option<&ResourceState> {
        self.resources.get(&address.to_string())
    }

    /// Resources of one type
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a ResourceState)> {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
    }
}

/// State of a single resource (or data source result)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Remote identifier
    pub id: String,

    /// Resource type, e.g. `openvpncloud_network`
    pub resource_type: String,

    /// Attribute values as last read from the remote API
    pub attributes: Map<String, Value>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            attributes: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn from_data(resource_type: &str, d: ResourceData) -> Self {
        let id = d.id().to_string();
        Self::new(id, resource_type).with_attributes(d.into_values())
    }

    /// New state from callback output, keeping the creation time
    pub(crate) fn refreshed(&self, d: ResourceData) -> Self {
        let mut next = Self::from_data(&self.resource_type, d);
        next.created_at = self.created_at;
        next
    }

    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Reads and writes `.openvpncloud/state.json` under a project directory
pub struct StateManager {
    dir: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            dir: project_root.as_ref().join(STATE_DIR),
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Recorded state; empty when nothing was saved yet
    pub async fn load(&self) -> Result<GlobalState> {
        let content = match fs::read_to_string(self.file(STATE_FILE)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No state in {}, starting empty", self.dir.display());
                return Ok(GlobalState::new());
            }
            Err(e) => return Err(e.into()),
        };

        let state: GlobalState = serde_json::from_str(&content)?;
        if state.version > STATE_VERSION {
            return Err(PluginError::StateError(format!(
                "{} uses format version {}, this build understands up to {}",
                STATE_FILE, state.version, STATE_VERSION
            )));
        }

        tracing::debug!("Loaded {} resources from state", state.resources.len());
        Ok(state)
    }

    /// Write `state`, moving the previous file to `state.json.backup`
    ///
    /// New content is written to a scratch file and renamed into place.
    pub async fn save(&self, state: &GlobalState) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let scratch = self.file(STATE_SCRATCH);
        fs::write(&scratch, serde_json::to_string_pretty(state)?).await?;

        let current = self.file(STATE_FILE);
        if fs::try_exists(&current).await? {
            fs::rename(&current, self.file(STATE_BACKUP)).await?;
        }
        fs::rename(&scratch, &current).await?;

        tracing::debug!("Saved {} resources to state", state.resources.len());
        Ok(())
    }

    /// Take the state lock
    ///
    /// Fails while another holder's lock is younger than an hour; an older
    /// lock is treated as abandoned and replaced.
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.file(LOCK_FILE);

        let info = LockInfo {
            holder: lock_holder(),
            acquired_at: Utc::now(),
        };
        let body = serde_json::to_vec_pretty(&info)?;

        for _ in 0..2 {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&body).await?;
                    file.flush().await?;
                    tracing::debug!("State lock taken by {}", info.holder);
                    return Ok(StateLock { path: Some(path) });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    let existing: LockInfo =
                        serde_json::from_str(&fs::read_to_string(&path).await?)?;
                    let age = Utc::now().signed_duration_since(existing.acquired_at);
                    if age.num_minutes() < LOCK_TTL_MINUTES {
                        return Err(PluginError::LockError(format!(
                            "{} is locked by {} (since {})",
                            STATE_FILE, existing.holder, existing.acquired_at
                        )));
                    }
                    tracing::warn!(
                        "Replacing abandoned state lock of {} from {}",
                        existing.holder,
                        existing.acquired_at
                    );
                    fs::remove_file(&path).await?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PluginError::LockError(format!(
            "{} lock was taken concurrently",
            STATE_FILE
        )))
    }
}

fn lock_holder() -> String {
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("HOST"))
        .unwrap_or_else(|_| "localhost".to_string());
    format!("{}/pid-{}", host, std::process::id())
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// Held state lock; the lock file is removed on release or drop
pub struct StateLock {
    path: Option<PathBuf>,
}

impl StateLock {
    pub async fn release(mut self) -> Result<()> {
        if let Some(path) = self.path.take() {
            fs::remove_file(&path).await?;
            tracing::debug!("State lock released");
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
