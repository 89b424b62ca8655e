use crate::GlobalArgs;
use crate::utils;
use colored::Colorize;
use openvpncloud_plugin::StateManager;
use openvpncloud_provider::provider;

pub async fn handle(global: &GlobalArgs, address: &str, id: &str) -> anyhow::Result<()> {
    let address = utils::parse_address(address)?;

    let provider = provider();
    let manager = StateManager::new(&global.dir);
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    if let Some(existing) = state.get_resource(&address) {
        anyhow::bail!("{} is already managed (id {})", address, existing.id);
    }

    let configured = utils::connect(&provider, global).await?;
    println!("{}", format!("Importing {} from {}...", address, id).yellow());
    let imported = configured
        .import(&address.resource_type, id)
        .await
        .map_err(utils::diagnostics_error)?;

    let attributes = imported.attributes.clone();
    state.set_resource(&address, imported);
    manager.save(&state).await?;
    lock.release().await?;

    println!("  ✓ {}", address.to_string().cyan());
    utils::print_header("Attributes");
    utils::print_attributes(provider.resource_schema(&address.resource_type), &attributes)?;
    println!();
    println!("{}", "Import complete!".green().bold());
    Ok(())
}
