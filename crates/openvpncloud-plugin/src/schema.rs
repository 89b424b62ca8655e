//! Attribute schemas for providers, resources and data sources
//!
//! A [`Schema`] describes the attributes a block accepts. Values travel as
//! JSON (`serde_json::Value`), so validation checks JSON types against the
//! declared [`ValueType`].

use crate::diag::{Diagnostic, Diagnostics};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Bool,
    Int,
    List,
    Set,
}

impl ValueType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::List | ValueType::Set => value.is_array(),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int => write!(f, "number"),
            ValueType::List => write!(f, "list"),
            ValueType::Set => write!(f, "set"),
        }
    }
}

/// Element type of a list or set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Primitive elements (strings, numbers, ...)
    Type(ValueType),
    /// Nested blocks with their own schema
    Block(Schema),
}

/// A single attribute declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub value_type: ValueType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<Element>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub computed: bool,

    #[serde(default)]
    pub sensitive: bool,

    #[serde(default)]
    pub force_new: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Environment variable consulted when the attribute is not configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    fn of(value_type: ValueType, elem: Option<Element>) -> Self {
        Self {
            value_type,
            elem,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            force_new: false,
            default: None,
            env_default: None,
            max_items: None,
            min_items: None,
            allowed_values: Vec::new(),
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::of(ValueType::String, None)
    }

    pub fn bool() -> Self {
        Self::of(ValueType::Bool, None)
    }

    pub fn int() -> Self {
        Self::of(ValueType::Int, None)
    }

    /// List of primitive values
    pub fn list_of(elem: ValueType) -> Self {
        Self::of(ValueType::List, Some(Element::Type(elem)))
    }

    /// Set of primitive values
    pub fn set_of(elem: ValueType) -> Self {
        Self::of(ValueType::Set, Some(Element::Type(elem)))
    }

    /// List of nested blocks
    pub fn list_of_blocks(block: Schema) -> Self {
        Self::of(ValueType::List, Some(Element::Block(block)))
    }

    /// Set of nested blocks
    pub fn set_of_blocks(block: Schema) -> Self {
        Self::of(ValueType::Set, Some(Element::Block(block)))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn env_default(mut self, var: impl Into<String>) -> Self {
        self.env_default = Some(var.into());
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    /// Restrict a string attribute to a fixed set of values
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Set by the remote side only, never configurable
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    fn block(&self) -> Option<&Schema> {
        match &self.elem {
            Some(Element::Block(block)) => Some(block),
            _ => None,
        }
    }

    fn resolve_default(&self) -> Option<Value> {
        if let Some(var) = &self.env_default {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    return Some(Value::String(value));
                }
            }
        }
        self.default.clone()
    }
}

/// Attribute map of a provider, resource, data source or nested block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute (builder style)
    pub fn attr(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attribute)> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Check a configuration object against the schema
    pub fn validate(&self, config: &Map<String, Value>) -> Diagnostics {
        let mut diags = Diagnostics::new();
        self.validate_at("", config, &mut diags);
        diags
    }

    fn validate_at(&self, prefix: &str, config: &Map<String, Value>, diags: &mut Diagnostics) {
        for key in config.keys() {
            if !self.attributes.contains_key(key) {
                diags.push(
                    Diagnostic::error(
                        "Unsupported argument",
                        format!("An argument named \"{}\" is not expected here.", key),
                    )
                    .with_attribute(join_path(prefix, key)),
                );
            }
        }

        for (name, attribute) in &self.attributes {
            let path = join_path(prefix, name);
            let value = config.get(name).filter(|v| !v.is_null());

            let Some(value) = value else {
                if attribute.required && attribute.resolve_default().is_none() {
                    diags.push(
                        Diagnostic::error(
                            "Missing required argument",
                            format!("The argument \"{}\" is required, but no definition was found.", name),
                        )
                        .with_attribute(path),
                    );
                }
                continue;
            };

            if attribute.is_computed_only() {
                diags.push(
                    Diagnostic::error(
                        "Value for unconfigurable attribute",
                        format!("Can't configure a value for \"{}\": its value is decided by the remote API.", name),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            attribute_value_errors(attribute, &path, value, diags);
        }
    }

    /// Fill unset attributes from their environment variable or default value
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for (name, attribute) in &self.attributes {
            let missing = config.get(name).is_none_or(Value::is_null);
            if missing {
                if let Some(value) = attribute.resolve_default() {
                    config.insert(name.clone(), value);
                }
                continue;
            }

            if let (Some(block), Some(Value::Array(items))) = (attribute.block(), config.get_mut(name)) {
                for item in items.iter_mut() {
                    if let Value::Object(map) = item {
                        block.apply_defaults(map);
                    }
                }
            }
        }
    }

    /// Names of `force_new` attributes whose configured value differs from `prior`
    pub fn force_new_changes(
        &self,
        prior: &Map<String, Value>,
        config: &Map<String, Value>,
    ) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(_, attribute)| attribute.force_new && !attribute.is_computed_only())
            .filter_map(|(name, attribute)| {
                let new = config.get(name).filter(|v| !v.is_null());
                let old = prior.get(name).filter(|v| !v.is_null());
                match (old, new) {
                    // optional+computed attribute left to the remote side
                    (_, None) if attribute.computed => None,
                    (old, new) if !values_equal(attribute, old, new) => Some(name.clone()),
                    _ => None,
                }
            })
            .collect()
    }

    /// Copy of `values` with sensitive attributes masked
    pub fn redact(&self, values: &Map<String, Value>) -> Map<String, Value> {
        values
            .iter()
            .map(|(key, value)| {
                let masked = match self.attributes.get(key) {
                    Some(attribute) if attribute.sensitive && !value.is_null() => {
                        Value::String("(sensitive)".to_string())
                    }
                    _ => value.clone(),
                };
                (key.clone(), masked)
            })
            .collect()
    }

    /// Merge a new configuration over prior state for an in-place update
    ///
    /// Configured values win. Computed attributes the configuration leaves out
    /// keep their prior value; everything else that is left out is dropped.
    /// Nested blocks inherit computed fields from their prior counterpart: the
    /// item at the same index for lists, the item with the same configured
    /// fields for sets.
    pub fn merge_for_update(
        &self,
        prior: &Map<String, Value>,
        config: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut merged = config.clone();

        for (name, attribute) in &self.attributes {
            let Some(prior_value) = prior.get(name).filter(|v| !v.is_null()) else {
                continue;
            };

            let configured = merged.get(name).is_some_and(|v| !v.is_null());
            if !configured {
                if attribute.computed {
                    merged.insert(name.clone(), prior_value.clone());
                }
                continue;
            }

            let (Some(block), Some(prior_items)) = (attribute.block(), prior_value.as_array()) else {
                continue;
            };
            let Some(Value::Array(items)) = merged.get_mut(name) else {
                continue;
            };

            for (i, item) in items.iter_mut().enumerate() {
                let Value::Object(item) = item else {
                    continue;
                };
                let counterpart = if attribute.value_type == ValueType::Set {
                    prior_items
                        .iter()
                        .filter_map(Value::as_object)
                        .find(|p| block.same_configuration(item, p))
                } else {
                    prior_items.get(i).and_then(Value::as_object)
                };
                if let Some(counterpart) = counterpart {
                    *item = block.merge_for_update(counterpart, item);
                }
            }
        }

        merged
    }

    /// Whether two block objects agree on every non-computed attribute
    fn same_configuration(&self, a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
        self.attributes
            .iter()
            .filter(|(_, attribute)| !attribute.computed)
            .all(|(name, _)| {
                let x = a.get(name).filter(|v| !v.is_null());
                let y = b.get(name).filter(|v| !v.is_null());
                x == y
            })
    }
}

fn attribute_value_errors(attribute: &Attribute, path: &str, value: &Value, diags: &mut Diagnostics) {
    if !attribute.value_type.matches(value) {
        diags.push(
            Diagnostic::error(
                "Incorrect attribute value type",
                format!("Inappropriate value for attribute: {} required.", attribute.value_type),
            )
            .with_attribute(path),
        );
        return;
    }

    if let Some(s) = value.as_str() {
        if !attribute.allowed_values.is_empty() && !attribute.allowed_values.iter().any(|a| a == s) {
            diags.push(
                Diagnostic::error(
                    "Invalid value",
                    format!(
                        "expected {} to be one of [{}], got {}",
                        path,
                        attribute.allowed_values.join(", "),
                        s
                    ),
                )
                .with_attribute(path),
            );
        }
        return;
    }

    let Some(items) = value.as_array() else {
        return;
    };

    if let Some(max) = attribute.max_items {
        if items.len() > max {
            diags.push(
                Diagnostic::error(
                    "Too many list items",
                    format!("Attribute supports {} item maximum, but config has {} declared.", max, items.len()),
                )
                .with_attribute(path),
            );
        }
    }
    if let Some(min) = attribute.min_items {
        if items.len() < min {
            diags.push(
                Diagnostic::error(
                    "Insufficient list items",
                    format!("Attribute requires {} item minimum, but config has only {} declared.", min, items.len()),
                )
                .with_attribute(path),
            );
        }
    }

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}.{}", path, i);
        match &attribute.elem {
            Some(Element::Block(block)) => match item.as_object() {
                Some(map) => block.validate_at(&item_path, map, diags),
                None => diags.push(
                    Diagnostic::error("Incorrect attribute value type", "block object required.")
                        .with_attribute(item_path),
                ),
            },
            Some(Element::Type(elem)) => {
                if !elem.matches(item) {
                    diags.push(
                        Diagnostic::error(
                            "Incorrect attribute value type",
                            format!("Inappropriate value for element: {} required.", elem),
                        )
                        .with_attribute(item_path),
                    );
                }
            }
            None => {}
        }
    }
}

fn values_equal(attribute: &Attribute, old: Option<&Value>, new: Option<&Value>) -> bool {
    match (old, new) {
        (None, None) => true,
        (Some(Value::Array(a)), Some(Value::Array(b))) if attribute.value_type == ValueType::Set => {
            a.len() == b.len() && a.iter().all(|x| b.contains(x))
        }
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
