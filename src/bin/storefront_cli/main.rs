// ABOUTME: Storefront settings CLI - operator tool for settings, cache, migrations, and serving
// ABOUTME: Wires the same resolver the HTTP API uses so CLI writes invalidate the shared cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors
//!
//! Usage:
//! ```bash
//! # Generate an encryption key for STOREFRONT_ENCRYPTION_KEY
//! storefront-cli generate-key
//!
//! # Read and write settings
//! storefront-cli get site_name
//! storefront-cli set product_card_showOrigin false
//! storefront-cli set smtp_password 's3cret' --category email
//!
//! # Encrypt plaintext secrets and canonicalize legacy values
//! storefront-cli migrate-encryption
//! storefront-cli migrate-legacy
//!
//! # Run the HTTP API
//! storefront-cli serve --port 8080
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use storefront_settings::config::ServerConfig;
use storefront_settings::logging::{LogFormat, LoggingConfig};
use storefront_settings::server;
use storefront_settings::settings::SettingCategory;

#[derive(Parser)]
#[command(
    name = "storefront-cli",
    about = "Storefront settings management CLI",
    long_about = "Command-line tool for reading and writing storefront settings, managing the settings cache, running data migrations, and serving the settings API."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Print a setting (decrypted if sensitive)
    Get {
        /// Setting key
        key: String,
    },

    /// Write a setting and invalidate its cache entries
    Set {
        /// Setting key
        key: String,

        /// Value; parsed as JSON when possible, otherwise stored as a string
        value: String,

        /// Category (inferred from the key prefix when omitted)
        #[arg(long)]
        category: Option<SettingCategory>,

        /// Store the value as a string even if it parses as JSON
        #[arg(long)]
        string: bool,
    },

    /// Remove every cached setting
    ClearCache,

    /// Encrypt sensitive settings still stored as plaintext
    MigrateEncryption,

    /// Rewrite legacy wrapped values in canonical form
    MigrateLegacy,

    /// Print a new random encryption key
    GenerateKey,

    /// Serve the settings HTTP API
    Serve {
        /// HTTP port override
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Key generation needs neither logging nor configuration
    if matches!(cli.command, Command::GenerateKey) {
        commands::keys::generate();
        return Ok(());
    }

    let serving = matches!(cli.command, Command::Serve { .. });
    let mut logging = LoggingConfig::from_env();
    if !serving {
        logging.format = LogFormat::Compact;
    }
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    let resolver = server::build_resolver(&config).await?;

    match cli.command {
        Command::Get { key } => commands::settings::get(&resolver, &key).await?,
        Command::Set {
            key,
            value,
            category,
            string,
        } => commands::settings::set(&resolver, &key, &value, category, string).await?,
        Command::ClearCache => commands::settings::clear_cache(&resolver).await,
        Command::MigrateEncryption => commands::migrate::encryption(&resolver).await?,
        Command::MigrateLegacy => commands::migrate::legacy(&resolver).await?,
        Command::Serve { port } => {
            if let Some(port) = port {
                config.http_port = port;
            }
            server::serve(&config, resolver).await?;
        }
        Command::GenerateKey => {}
    }

    Ok(())
}
