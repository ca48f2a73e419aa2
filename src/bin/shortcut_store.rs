//! shortcut-store CLI
//!
//! Lists, identifies and sets icons for non-Steam shortcuts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shortcut_store::artwork::{entry_asset_file_name, legacy_grid_alias, AssetKind, Orientation};
use shortcut_store::{derive, Config, Shortcuts};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "shortcut-store")]
#[command(about = "Inspect and edit the Steam shortcuts.vdf store")]
struct Args {
    /// Path to shortcuts.vdf (overrides the configured Steam root and account)
    #[arg(short = 's', long, global = true)]
    store: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List shortcuts with their ids
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive the ids for an executable and name
    Id {
        /// Launch command exactly as stored (quotes included)
        #[arg(long)]
        exe: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Explicit appid field value
        #[arg(long)]
        appid: Option<u32>,
    },

    /// Set the icon of the shortcut at POSITION
    SetIcon { position: usize, icon_path: String },

    /// Print the artwork file name for the shortcut at POSITION
    Artwork {
        position: usize,

        /// Asset kind (grid, hero, logo, icon)
        #[arg(long, default_value = "grid")]
        kind: AssetKind,

        /// Grid orientation (p, l)
        #[arg(long, default_value = "l")]
        orientation: Orientation,

        /// Source URL, used for the icon extension
        #[arg(long, default_value = "")]
        url: String,
    },
}

fn open_store(args: &Args, config: &Config) -> Result<Shortcuts> {
    let shortcuts = match &args.store {
        Some(path) => Shortcuts::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .with_backup(config.backup),
        None => Shortcuts::open_with_config(config).context("Failed to open shortcuts store")?,
    };
    Ok(shortcuts)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                config
                    .log_level
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    match &args.command {
        Command::List { json } => {
            let shortcuts = open_store(&args, &config)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(shortcuts.entries())?);
            } else {
                for entry in shortcuts.entries() {
                    println!(
                        "{:>3}  {:<10}  {:<20}  {}{}",
                        entry.position,
                        entry.identifier,
                        entry.legacy_identifier,
                        entry.name,
                        entry
                            .icon_path
                            .as_deref()
                            .map(|icon| format!("  [{}]", icon))
                            .unwrap_or_default()
                    );
                }
            }
        }
        Command::Id { exe, name, appid } => {
            let ids = derive(name, exe, *appid);
            println!("identifier: {}", ids.identifier);
            println!("legacy_identifier: {}", ids.legacy_identifier);
        }
        Command::SetIcon {
            position,
            icon_path,
        } => {
            let mut shortcuts = open_store(&args, &config)?;
            let entry = shortcuts
                .set_icon(*position, icon_path)
                .with_context(|| format!("Failed to set icon of shortcut {}", position))?;
            info!("Set icon of '{}' to {}", entry.name, icon_path);
        }
        Command::Artwork {
            position,
            kind,
            orientation,
            url,
        } => {
            let shortcuts = open_store(&args, &config)?;
            let entry = shortcuts.entry(*position)?;
            println!("{}", entry_asset_file_name(entry, *kind, *orientation, url));
            if *kind == AssetKind::Grid && *orientation == Orientation::Landscape {
                let (link, target) = legacy_grid_alias(entry);
                println!("{} -> {}", link, target);
            }
        }
    }

    Ok(())
}
