//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` (from the environment or `.env`) and applies, rolls back
//! or reports the schema migrations: `migration up`, `migration down`, `migration status`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    cli::run_cli(migration::Migrator).await;
}
