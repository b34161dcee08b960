//! HafizLy CLI
//!
//! Command-line interface for HafizLy - public/private link bookmarking
//! backed by a remote hosted table.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use hafizly_core::{CategoryFilter, Config, LinkStore, RemoteTable};

mod commands;
mod metadata;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "hafizly")]
#[command(about = "HafizLy - public and private link bookmarking")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Manage the private-links passcode
    Passcode {
        #[command(subcommand)]
        command: PasscodeCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show backend status and link counts
    Status,
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Save a new link
    #[command(alias = "create")]
    Add {
        /// URL to save (must start with http:// or https://)
        url: String,
        /// Display name (pre-filled from page metadata when omitted)
        #[arg(short, long)]
        name: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Save as Private instead of Public
        #[arg(short, long)]
        private: bool,
    },
    /// List links
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long, value_enum, default_value = "all")]
        category: CategoryArg,
        /// Case-insensitive search over name, description, and URL
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show link details
    Show {
        /// Link id (as printed by `link list`)
        id: i64,
    },
    /// Edit a link
    Edit {
        /// Link id
        id: i64,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link id
        id: i64,
    },
    /// Flip a link between Public and Private
    Toggle {
        /// Link id
        id: i64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CategoryArg {
    All,
    Public,
    Private,
}

impl From<CategoryArg> for CategoryFilter {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => CategoryFilter::All,
            CategoryArg::Public => CategoryFilter::Public,
            CategoryArg::Private => CategoryFilter::Private,
        }
    }
}

#[derive(Subcommand, Clone)]
enum PasscodeCommands {
    /// Set or change the passcode
    Set,
    /// Show whether a passcode is set
    Status,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, table_url, api_key, table, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Commands that don't need the remote table
    match &cli.command {
        Some(Commands::Config { command }) => {
            return handle_config_command(command.clone(), &output);
        }
        Some(Commands::Passcode { command }) => {
            return handle_passcode_command(command.clone(), &output);
        }
        _ => {}
    }

    // Handle TUI (default when no command given)
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run().await;
    }

    let config = Config::load().context("Failed to load configuration")?;
    let mut store = open_store(&config)?;

    match cli.command.unwrap() {
        Commands::Tui => unreachable!(),            // Handled above
        Commands::Config { .. } => unreachable!(),  // Handled above
        Commands::Passcode { .. } => unreachable!(), // Handled above
        Commands::Link { command } => {
            handle_link_command(command, &mut store, &config, &output).await
        }
        Commands::Status => commands::status::show(&mut store, &config, &output).await,
    }
}

/// Build a store over the configured remote table
fn open_store(config: &Config) -> Result<LinkStore> {
    let table_url = config.table_url.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "No table URL configured. Set one with:\n  \
             hafizly config set table_url https://your-project.supabase.co"
        )
    })?;

    let table = RemoteTable::new(
        table_url,
        &config.table,
        config.api_key.clone().unwrap_or_default(),
    )
    .context("Failed to create table client")?;

    Ok(LinkStore::new(Arc::new(table)))
}

async fn handle_link_command(
    command: LinkCommands,
    store: &mut LinkStore,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add {
            url,
            name,
            description,
            private,
        } => commands::link::add(store, url, name, description, private, output).await,
        LinkCommands::List { category, search } => {
            commands::link::list(store, config, category.into(), search, output).await
        }
        LinkCommands::Show { id } => commands::link::show(store, config, id, output).await,
        LinkCommands::Edit { id } => commands::link::edit(store, config, id, output).await,
        LinkCommands::Delete { id } => commands::link::delete(store, id, output).await,
        LinkCommands::Toggle { id } => commands::link::toggle(store, id, output).await,
    }
}

fn handle_passcode_command(command: PasscodeCommands, output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    match command {
        PasscodeCommands::Set => commands::passcode::set(&config, output),
        PasscodeCommands::Status => commands::passcode::status(&config, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
