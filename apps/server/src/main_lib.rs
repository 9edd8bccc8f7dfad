use std::sync::Arc;

use crate::config::Config;
use fxdeals_core::deals::{DealService, DealServiceTrait};
use fxdeals_storage_sqlite::{db, deals::DealRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub deal_service: Arc<dyn DealServiceTrait>,
}

/// Installs the global subscriber. `log_format` is `json` or anything else for text.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let deal_repository = Arc::new(DealRepository::new(pool.clone(), writer));
    let deal_service: Arc<dyn DealServiceTrait> = Arc::new(DealService::new(deal_repository));

    Ok(Arc::new(AppState { deal_service }))
}
