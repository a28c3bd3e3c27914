//! services/console/src/bin/console.rs

use console_lib::{
    adapters::{FileSessionSlot, JsonSeedAdapter, MemorySessionSlot},
    config::{Config, SessionStoreKind},
    console::{shell, ConsoleContext},
    error::ConsoleError,
};
use recordkeep_core::ports::SessionSlot;
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    // --- 1. Load Configuration & Set Up Logging ---
    // Logs go to stderr; stdout carries the replies.
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting console...");

    // --- 2. Initialize Port Adapters ---
    let seed = JsonSeedAdapter::new(&config.seed_path);
    let slot: Arc<dyn SessionSlot> = match config.session_store {
        SessionStoreKind::File => {
            info!(dir = %config.session_dir.display(), "Using file session slot");
            Arc::new(FileSessionSlot::new(&config.session_dir))
        }
        SessionStoreKind::Memory => {
            info!("Using in-memory session slot; sessions end with the process");
            Arc::new(MemorySessionSlot::new())
        }
    };

    // --- 3. Build the Console Context ---
    let mut ctx = ConsoleContext::init(&seed, slot, &config).await?;
    match ctx.current_user() {
        Some(user) => info!(username = %user.username, "Resuming session"),
        None => info!("No active session; send a login command"),
    }

    // --- 4. Run the Command Loop ---
    shell::run(&mut ctx, BufReader::new(io::stdin()), io::stdout()).await?;

    Ok(())
}
