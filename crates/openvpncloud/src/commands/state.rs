use crate::GlobalArgs;
use crate::utils;
use colored::Colorize;
use openvpncloud_plugin::StateManager;
use openvpncloud_provider::provider;

pub async fn handle_list(global: &GlobalArgs, resource_type: Option<&str>) -> anyhow::Result<()> {
    let state = StateManager::new(&global.dir).load().await?;

    let entries: Vec<_> = match resource_type {
        Some(resource_type) => state.resources_of_type(resource_type).collect(),
        None => state.resources.iter().collect(),
    };
    if entries.is_empty() {
        println!("{}", "No resources recorded in state".dimmed());
        return Ok(());
    }

    println!(
        "{:<40} {:<28} {}",
        "ADDRESS".bold(),
        "ID".bold(),
        "UPDATED".bold()
    );
    println!("{}", "─".repeat(90).dimmed());
    for (address, resource) in entries {
        println!(
            "{:<40} {:<28} {}",
            address.cyan(),
            resource.id,
            resource
                .updated_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
    }
    Ok(())
}

pub async fn handle_show(global: &GlobalArgs, address: &str) -> anyhow::Result<()> {
    let address = utils::parse_address(address)?;
    let state = StateManager::new(&global.dir).load().await?;

    let resource = state
        .get_resource(&address)
        .ok_or_else(|| anyhow::anyhow!("{} is not recorded in state", address))?;

    println!("{} {}", address.to_string().cyan().bold(), format!("[id={}]", resource.id).dimmed());
    println!(
        "{}",
        format!(
            "created {}, updated {}",
            resource.created_at.to_rfc3339(),
            resource.updated_at.to_rfc3339()
        )
        .dimmed()
    );
    utils::print_header("Attributes");
    utils::print_attributes(provider().resource_schema(&resource.resource_type), &resource.attributes)
}
