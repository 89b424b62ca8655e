use crate::GlobalArgs;
use crate::utils;
use colored::Colorize;
use openvpncloud_plugin::StateManager;
use openvpncloud_provider::provider;

pub async fn handle(global: &GlobalArgs, address: &str) -> anyhow::Result<()> {
    let address = utils::parse_address(address)?;

    let provider = provider();
    let manager = StateManager::new(&global.dir);
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    let existing = state
        .get_resource(&address)
        .ok_or_else(|| anyhow::anyhow!("{} is not recorded in state", address))?;

    let configured = utils::connect(&provider, global).await?;
    println!("{}", format!("Refreshing {} ({})...", address, existing.id).yellow());

    let refreshed = configured
        .read(existing)
        .await
        .map_err(utils::diagnostics_error)?;

    match refreshed {
        Some(refreshed) => {
            let attributes = refreshed.attributes.clone();
            state.set_resource(&address, refreshed);
            manager.save(&state).await?;
            lock.release().await?;

            println!("  ✓ {}", address.to_string().cyan());
            utils::print_header("Attributes");
            utils::print_attributes(provider.resource_schema(&address.resource_type), &attributes)?;
        }
        None => {
            state.remove_resource(&address);
            manager.save(&state).await?;
            lock.release().await?;

            println!(
                "  ⚠ {} no longer exists remotely; removed from state",
                address.to_string().cyan()
            );
        }
    }
    Ok(())
}
