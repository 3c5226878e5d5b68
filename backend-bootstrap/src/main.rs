use anyhow::Result;
use clap::Parser;

use backend_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "equiptrack-backend")]
#[command(about = "Equipment tracking backend server", long_about = None)]
struct Args {
    /// Path to config file (defaults to $EQUIPTRACK_CONFIG, then ./config.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).await?;
    let _log_guard = backend_bootstrap::init_tracing(&config)?;

    backend_bootstrap::run_standalone(config).await
}
