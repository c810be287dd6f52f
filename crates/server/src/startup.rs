use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::seed::{self, SeedOutcome};

use crate::{routes, state::AppState};

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect, migrate and (optionally) seed. Everything the router needs.
pub async fn prepare_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    common::env::ensure_env(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    if cfg.seed.enabled {
        match seed::initialize(&db).await? {
            SeedOutcome::Skipped => info!("catalog already populated"),
            SeedOutcome::Seeded { categories, products, users } => {
                info!(categories, products, users, "catalog seeded")
            }
        }
    } else {
        info!("seeding disabled by configuration");
    }
    Ok(AppState::new(db))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_env()?;
    let state = prepare_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "catalog api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
