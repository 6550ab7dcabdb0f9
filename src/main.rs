use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use plato::commands;
use plato::config::Config;

#[derive(Parser)]
#[command(name = "plato")]
#[command(about = "User management service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Drop all tables and rebuild the schema
    RecreateDb,
    /// Insert the sample users
    SeedDb {
        /// Password given to every seeded user
        #[arg(long, default_value = "changeme")]
        password: String,
    },
    /// Grant (or revoke) admin rights for the user with this email
    SetAdmin {
        #[arg(value_name = "EMAIL")]
        email: String,
        #[arg(long)]
        revoke: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(pool, config).await?,
        Command::RecreateDb => {
            commands::recreate_db(&pool).await?;
            tracing::info!("Database recreated");
        }
        Command::SeedDb { password } => {
            let added = commands::seed_db(&pool, &password).await?;
            tracing::info!("Seeded {added} users");
        }
        Command::SetAdmin { email, revoke } => {
            commands::set_admin(&pool, &email, !revoke).await?;
        }
    }

    Ok(())
}

async fn serve(pool: PgPool, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting plato ({:?})", config.environment);

    commands::migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let addr = SocketAddr::new(config.host, config.port);
    let app = plato::build_app(pool, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
