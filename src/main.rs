use clap::Parser;
use donation::{
    adapter::http::{router, AppState},
    service::{boot, Config},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "donation", version, about = "A donation reconciliation service", long_about = None)]
struct Cli {
    /// Override the configured HTTP port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let mut config = Config::load();
    if let Some(port) = args.port {
        config.port = port;
    }

    let app = boot(&config).await;
    let state = AppState::new(&app);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
