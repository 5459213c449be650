//! Blockforge worker
//!
//! Composes every block declaration in a directory and writes the resulting
//! field groups as JSON, either one file per block or a single array on stdout.

use blockforge_registry::{Composer, InMemoryRegistry};
use tracing::info;

mod batch;
mod config;
mod error;

use config::WorkerConfig;
use error::Result;

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout may carry the composed output
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "blockforge=debug,blockforge_registry=debug,blockforge_worker=info".to_string()
        }))
        .with_writer(std::io::stderr)
        .init();

    let config = WorkerConfig::from_env()?;
    info!(
        version = blockforge::version(),
        blocks_dir = %config.blocks_dir.display(),
        "Starting blockforge worker"
    );

    let composer = Composer::new(config.composer_config()?, InMemoryRegistry::new());
    let report = batch::run(&config, &composer, &mut std::io::stdout().lock())?;

    info!(
        composed = report.composed.len(),
        skipped = report.skipped,
        "Done"
    );
    Ok(())
}
