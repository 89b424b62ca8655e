use crate::GlobalArgs;
use crate::utils;
use colored::Colorize;
use openvpncloud_plugin::{ApplyError, StateManager};
use openvpncloud_provider::provider;
use std::path::Path;

pub async fn handle(global: &GlobalArgs, address: &str, file: &Path) -> anyhow::Result<()> {
    let address = utils::parse_address(address)?;
    let config = utils::read_config(file)?;

    let provider = provider();
    let schema = provider
        .resource_schema(&address.resource_type)
        .ok_or_else(|| anyhow::anyhow!("Unknown resource type '{}'", address.resource_type))?;

    let manager = StateManager::new(&global.dir);
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    let configured = utils::connect(&provider, global).await?;

    let outcome = match state.get_resource(&address) {
        Some(existing) => {
            println!("{}", format!("Updating {} ({})...", address, existing.id).yellow());
            configured.update(existing, config).await
        }
        None => {
            println!("{}", format!("Creating {}...", address).yellow());
            configured.create(&address.resource_type, config).await
        }
    };

    let result = match outcome {
        Ok(result) => result,
        Err(ApplyError {
            partial,
            diagnostics,
        }) => {
            if let Some(partial) = partial {
                println!(
                    "  ⚠ {} was partially applied; recorded {} in state",
                    address.to_string().cyan(),
                    partial.id
                );
                state.set_resource(&address, partial);
                manager.save(&state).await?;
            }
            lock.release().await?;
            return Err(utils::diagnostics_error(diagnostics));
        }
    };

    let id = result.id.clone();
    let attributes = result.attributes.clone();
    state.set_resource(&address, result);
    manager.save(&state).await?;
    lock.release().await?;

    println!("  ✓ {} {}", address.to_string().cyan(), format!("[id={}]", id).dimmed());
    utils::print_header("Attributes");
    utils::print_attributes(Some(schema), &attributes)?;
    println!();
    println!("{}", "Apply complete!".green().bold());
    Ok(())
}
