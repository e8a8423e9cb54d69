// ABOUTME: SQLite database connection management and schema migrations
// ABOUTME: Exposes user and chat transcript operations over a shared pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Database Layer
//!
//! SQLite-backed persistence for user accounts and chat transcripts.
//! Schema is created idempotently at startup; all operations go through
//! a shared connection pool.

mod chat;
mod users;

pub use chat::{ChatMessageRecord, HistoryPage};

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection manager
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or
    /// schema migration fails
    pub async fn new(connection_string: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(connection_string)
            .with_context(|| format!("Invalid database URL: {connection_string}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        let database = Self { pool };
        database.migrate().await?;

        Ok(database)
    }

    /// Access the underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_chat().await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Check database reachability for health probes
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot execute a trivial query
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
