// ABOUTME: Paybot server binary wiring config, database, auth, and intent engine
// ABOUTME: Parses CLI overrides, initializes logging, and runs the HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Paybot Server Binary
//!
//! Starts the chatbot backend with user authentication, SQLite storage,
//! and the intent classification engine.

use anyhow::Result;
use clap::Parser;
use paybot_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::{DatabaseUrl, ServerConfig},
    database::Database,
    intent::{IntentCatalog, IntentResponder},
    logging,
    server::{HttpServer, ServerResources},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "paybot-server")]
#[command(about = "Paybot - payroll assistant chat backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = DatabaseUrl::parse_url(&database_url);
    }

    logging::init_from_env()?;

    info!("Starting Paybot server");
    info!("{}", config.summary());

    // Database file parent directory must exist before SQLite creates the file
    if let DatabaseUrl::SQLite { path } = &config.database_url {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    info!("Database initialized: {}", config.database_url);

    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => secret.as_bytes().to_vec(),
        None => {
            info!("JWT_SECRET not set; generating a random secret for this run");
            generate_jwt_secret()?.to_vec()
        }
    };
    let auth_manager = AuthManager::new(jwt_secret, config.auth.jwt_expiry_hours);
    info!("Authentication manager initialized");

    let catalog = IntentCatalog::load(&config.chatbot.model_dir)?;
    let intent_responder = IntentResponder::new(
        catalog,
        config.chatbot.confidence_threshold,
        config.chatbot.max_message_chars,
    );
    info!("Intent engine ready");

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        intent_responder,
        config,
    ));

    HttpServer::new(resources).run(http_port).await
}
