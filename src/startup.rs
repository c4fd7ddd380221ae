//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{Authenticator, JwtAuthenticator, PresenceHub};
use crate::config::Settings;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgContentRepository, PgGraphRepository, PgReadMarkerRepository,
};
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub hub: Arc<PresenceHub>,
    pub authenticator: Arc<dyn Authenticator>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the PostgreSQL-backed stores and the presence hub over `db`.
    pub fn new(db: PgPool, settings: Settings) -> Self {
        let graph = Arc::new(PgGraphRepository::new(db.clone()));
        let content = Arc::new(PgContentRepository::new(db.clone()));
        let markers = Arc::new(PgReadMarkerRepository::new(db.clone()));

        let hub = Arc::new(PresenceHub::new(graph, content, markers, &settings.presence));
        let authenticator = Arc::new(JwtAuthenticator::new(&settings.jwt));

        Self {
            db,
            hub,
            authenticator,
            settings: Arc::new(settings),
        }
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        // Create database pool
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db).await?;
            tracing::info!("Database migrations applied");
        }

        let addr = settings.server_addr();
        let cors_layer = cors::create_cors_layer(&settings.cors);

        let state = AppState::new(db, settings);

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors_layer);

        // Bind to address
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
