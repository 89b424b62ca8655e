mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "openvpncloud")]
#[command(about = "Manage OpenVPN Cloud networks, users and hosts", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Connection and project options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Cloud API base URL, e.g. https://acme.api.openvpn.com
    #[arg(long, global = true, env = "OPENVPN_CLOUD_BASE_URL")]
    pub base_url: Option<String>,

    /// OAuth client id (falls back to OPENVPN_CLOUD_CLIENT_ID)
    #[arg(long, global = true)]
    pub client_id: Option<String>,

    /// OAuth client secret (falls back to OPENVPN_CLOUD_CLIENT_SECRET)
    #[arg(long, global = true)]
    pub client_secret: Option<String>,

    /// Project directory holding .openvpncloud/state.json
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider schema as JSON
    Schema,
    /// List resource and data source types
    Types,
    /// Create or update a resource from a JSON configuration file
    Apply {
        /// Resource address (<type>.<name>)
        address: String,
        /// JSON object with the resource arguments
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Re-read a resource and record its current attributes
    Refresh {
        /// Resource address (<type>.<name>)
        address: String,
    },
    /// Delete a resource and drop it from state
    Destroy {
        /// Resource address (<type>.<name>)
        address: String,
    },
    /// Adopt an existing remote object into state
    Import {
        /// Resource address (<type>.<name>)
        address: String,
        /// Remote object id
        id: String,
    },
    /// Run a data source lookup
    Data {
        /// Data source type, e.g. openvpncloud_network
        data_source: String,
        /// JSON object with the lookup arguments
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Inspect recorded state
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum StateCommands {
    /// List recorded resources
    List {
        /// Only list resources of this type, e.g. openvpncloud_network
        #[arg(long = "type")]
        resource_type: Option<String>,
    },
    /// Show the attributes of one recorded resource
    Show {
        /// Resource address (<type>.<name>)
        address: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let global = cli.global;
    match cli.command {
        Commands::Version => {
            println!("openvpncloud {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Schema => commands::schema::handle_schema()?,
        Commands::Types => commands::schema::handle_types(),
        Commands::Apply { address, file } => {
            commands::apply::handle(&global, &address, &file).await?;
        }
        Commands::Refresh { address } => {
            commands::refresh::handle(&global, &address).await?;
        }
        Commands::Destroy { address } => {
            commands::destroy::handle(&global, &address).await?;
        }
        Commands::Import { address, id } => {
            commands::import::handle(&global, &address, &id).await?;
        }
        Commands::Data { data_source, file } => {
            commands::data::handle(&global, &data_source, &file).await?;
        }
        Commands::State { command } => match command {
            StateCommands::List { resource_type } => {
                commands::state::handle_list(&global, resource_type.as_deref()).await?;
            }
            StateCommands::Show { address } => {
                commands::state::handle_show(&global, &address).await?;
            }
        },
    }

    Ok(())
}
