use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pizza_restaurant_service::handlers::{app, AppState};
use pizza_restaurant_service::{establish_pool, run_migrations, seed::seed, DatabaseConfig};

#[derive(Parser)]
#[command(version, about = "Restaurants, pizzas and their prices over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations, then serve the HTTP API
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
        bind: String,
        #[arg(long, env = "PORT", default_value_t = 5555)]
        port: u16,
    },
    /// Apply pending migrations and exit
    Migrate,
    /// Replace the database contents with demo restaurants and pizzas
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = DatabaseConfig::from_env();
    let pool = establish_pool(&config)?;
    run_migrations(&pool)?;

    match cli.command {
        Commands::Serve { bind, port } => {
            let listener = TcpListener::bind((bind.as_str(), port)).await?;
            info!(database = %config.url, "listening on {}", listener.local_addr()?);

            axum::serve(listener, app(AppState::new(pool)))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Commands::Migrate => {}
        Commands::Seed => {
            let mut conn = pool.get()?;
            seed(&mut conn)?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received Ctrl+C, shutting down"),
        _ = terminate => warn!("received SIGTERM, shutting down"),
    }
}
