use crate::GlobalArgs;
use colored::Colorize;
use openvpncloud_plugin::{ConfiguredProvider, Diagnostics, ResourceAddress, Schema};
use openvpncloud_provider::{CloudProvider, Meta};
use serde_json::{Map, Value};
use std::path::Path;

/// Read a JSON object from a configuration file
pub fn read_config(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("{} must contain a JSON object", path.display()),
    }
}

pub fn parse_address(address: &str) -> anyhow::Result<ResourceAddress> {
    Ok(address.parse()?)
}

/// Provider configuration from the global flags; unset flags fall back to
/// the schema's environment defaults
pub fn provider_config(global: &GlobalArgs) -> Map<String, Value> {
    let mut config = Map::new();
    if let Some(base_url) = &global.base_url {
        config.insert("base_url".into(), Value::String(base_url.clone()));
    }
    if let Some(client_id) = &global.client_id {
        config.insert("client_id".into(), Value::String(client_id.clone()));
    }
    if let Some(client_secret) = &global.client_secret {
        config.insert("client_secret".into(), Value::String(client_secret.clone()));
    }
    config
}

/// Configure the provider and authenticate against the API
pub async fn connect<'a>(
    provider: &'a CloudProvider,
    global: &GlobalArgs,
) -> anyhow::Result<ConfiguredProvider<'a, Meta>> {
    println!("{}", "Connecting to OpenVPN Cloud...".blue());
    tracing::debug!("Configuring provider for {:?}", global.base_url);
    provider
        .configure(provider_config(global))
        .await
        .map_err(diagnostics_error)
}

pub fn diagnostics_error(diags: Diagnostics) -> anyhow::Error {
    anyhow::anyhow!("{}", diags)
}

/// Print attributes as JSON with sensitive values masked
pub fn print_attributes(schema: Option<Schema>, attributes: &Map<String, Value>) -> anyhow::Result<()> {
    let shown = match schema {
        Some(schema) => schema.redact(attributes),
        None => attributes.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(60).dimmed());
}
