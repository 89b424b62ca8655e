//! Resource data handed to provider, resource and data source callbacks

use serde_json::{Map, Value};

/// Read access to an attribute object
///
/// Getters follow the host convention of returning zero values for unset
/// attributes: `""`, `false`, `0` and empty lists.
pub trait Fields {
    fn fields(&self) -> &Map<String, Value>;

    fn get(&self, key: &str) -> Option<&Value> {
        self.fields().get(key).filter(|v| !v.is_null())
    }

    fn get_str(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn get_i64(&self, key: &str) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(0)
    }

    fn get_string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nested blocks of a list or set attribute
    fn get_blocks(&self, key: &str) -> Vec<Block<'_>> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_object).map(Block).collect())
            .unwrap_or_default()
    }

    /// First nested block of a single-item list attribute
    fn get_block(&self, key: &str) -> Option<Block<'_>> {
        self.get_blocks(key).into_iter().next()
    }
}

/// Borrowed view of a nested block
#[derive(Debug, Clone, Copy)]
pub struct Block<'a>(&'a Map<String, Value>);

impl<'a> Block<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self(map)
    }
}

impl Fields for Block<'_> {
    fn fields(&self) -> &Map<String, Value> {
        self.0
    }
}

/// Generic resource state passed through lifecycle callbacks
///
/// `values` is the working copy a callback reads from and writes to. During an
/// update, `prior` holds the state recorded before the change so callbacks can
/// ask what changed.
#[derive(Debug, Clone, Default)]
pub struct ResourceData {
    id: Option<String>,
    values: Map<String, Value>,
    prior: Option<Map<String, Value>>,
}

impl ResourceData {
    /// Data for a resource that does not exist yet (or a data source lookup)
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            id: None,
            values,
            prior: None,
        }
    }

    /// Data for an existing resource
    pub fn from_state(id: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            id: Some(id.into()),
            values,
            prior: None,
        }
    }

    /// Data for an in-place update: `values` already merged over `prior`
    pub fn for_update(
        id: impl Into<String>,
        prior: Map<String, Value>,
        values: Map<String, Value>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            values,
            prior: Some(prior),
        }
    }

    /// Remote identifier, empty when unset
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Whether `key` differs between prior state and current values
    ///
    /// Always false outside of an update.
    pub fn has_change(&self, key: &str) -> bool {
        let (old, new) = self.get_change(key);
        self.prior.is_some() && old != new
    }

    pub fn has_changes(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.has_change(k))
    }

    /// `(prior, current)` value of `key`
    pub fn get_change(&self, key: &str) -> (Option<&Value>, Option<&Value>) {
        let old = self
            .prior
            .as_ref()
            .and_then(|p| p.get(key))
            .filter(|v| !v.is_null());
        (old, self.get(key))
    }

    /// Prior state as a block view, if this is an update
    pub fn prior(&self) -> Option<Block<'_>> {
        self.prior.as_ref().map(Block)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }
}

impl Fields for ResourceData {
    fn fields(&self) -> &Map<String, Value> {
        &self.values
    }
}
