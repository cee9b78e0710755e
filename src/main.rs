use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quotefeed::config::{AppConfig, EmailProvider};
use quotefeed::email::{BrevoBackend, ConsoleBackend, EmailSender};
use quotefeed::routes;
use quotefeed::state::AppState;
use quotefeed::store::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(AppConfig::load()?);

    // Lazy pool: the first query connects, so startup does not depend on the
    // database being reachable.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(&config.database_url)
        .context("invalid database URL")?;
    let store = Arc::new(PgStore::new(pool));

    let email: Arc<dyn EmailSender> = match config.email.provider {
        EmailProvider::Brevo => Arc::new(BrevoBackend::new(
            config.email.base_url.clone(),
            config.email.api_key.clone(),
        )),
        EmailProvider::Console => Arc::new(ConsoleBackend::verbose()),
    };

    let state = AppState::new(
        Arc::clone(&config),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        email,
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "quotefeed listening");

    axum::serve(listener, routes::router(state))
        .await
        .context("server error")?;
    Ok(())
}
