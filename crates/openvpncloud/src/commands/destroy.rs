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
    println!("{}", format!("Destroying {} ({})...", address, existing.id).yellow());
    configured
        .delete(existing)
        .await
        .map_err(utils::diagnostics_error)?;

    state.remove_resource(&address);
    manager.save(&state).await?;
    lock.release().await?;

    println!("  ✓ {}", address.to_string().cyan());
    println!();
    println!("{}", "Destroy complete!".green().bold());
    Ok(())
}
