use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sl_core::services::session::{SessionLifecycleManager, TokenSweepService};
use sl_infra::database::{DatabasePool, MySqlTokenStore, MySqlUserDirectory};
use sl_shared::config::environment::LogFormat;
use sl_shared::config::{Environment, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables, the environment-specific file first
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let config = sl_infra::load_config()?;
    init_tracing(&config.logging);

    info!("Starting persistent token sweeper ({})", config.environment);

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    pool.run_migrations().await?;

    let tokens = Arc::new(MySqlTokenStore::new(pool.get_pool().clone()));
    let users = Arc::new(MySqlUserDirectory::new(pool.get_pool().clone()));
    let manager = Arc::new(SessionLifecycleManager::new(tokens, users, config.session.clone()));
    let sweep = Arc::new(TokenSweepService::new(manager));

    let Some(mut handle) = sweep.start_background_task() else {
        warn!("Nothing to do, exiting");
        pool.close().await;
        return Ok(());
    };

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received, stopping sweeper");
            handle.abort();
        }
        joined = &mut handle => {
            error!("Persistent token sweep task stopped");
            pool.close().await;
            return match joined {
                Ok(()) => Err(anyhow::anyhow!("Sweep task exited unexpectedly")),
                Err(e) => Err(anyhow::Error::new(e).context("Sweep task failed")),
            };
        }
    }
    info!("{}", pool.get_statistics());
    pool.close().await;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(logging.colored)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.init(),
    }
}
