use colored::Colorize;
use openvpncloud_provider::provider;

pub fn handle_schema() -> anyhow::Result<()> {
    let document = provider().schema_document();
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

pub fn handle_types() {
    let provider = provider();

    println!("{}", "Resources:".bold());
    for type_name in provider.resource_types() {
        println!("  • {}", type_name.cyan());
    }

    println!();
    println!("{}", "Data sources:".bold());
    for type_name in provider.data_source_types() {
        println!("  • {}", type_name.cyan());
    }
}
