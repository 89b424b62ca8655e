use crate::GlobalArgs;
use crate::utils;
use openvpncloud_provider::provider;
use serde_json::Value;
use std::path::Path;

/// Run a lookup and print its result as JSON on stdout
pub async fn handle(global: &GlobalArgs, data_source: &str, file: &Path) -> anyhow::Result<()> {
    let config = utils::read_config(file)?;

    let provider = provider();
    let schema = provider
        .data_source_schema(data_source)
        .ok_or_else(|| anyhow::anyhow!("Unknown data source '{}'", data_source))?;

    let configured = utils::connect(&provider, global).await?;
    let result = configured
        .read_data(data_source, config)
        .await
        .map_err(utils::diagnostics_error)?;

    let mut shown = schema.redact(&result.attributes);
    shown.insert("id".into(), Value::String(result.id));
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}
