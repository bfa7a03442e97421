pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod learning;
pub mod models;
pub mod routes;
pub mod seed;
pub mod speech;
pub mod state;
pub mod store;
pub mod study;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::path::Path;

use crate::config::Config;
use crate::fixtures::{BuiltinFixtures, FallbackLessons};
use crate::state::AppState;
use crate::store::PgStore;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(routes::router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
        )
}

pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Wires storage from configuration. Database trouble is logged, not fatal:
/// handlers fall back to bundled lessons until it recovers.
pub async fn build_state(cfg: &Config) -> Result<AppState, sqlx::Error> {
    let state = match &cfg.database {
        Some(db_cfg) => {
            let pool = db::connect(db_cfg)?;
            if let Err(e) = db::migrate(&pool).await {
                tracing::warn!(error = %e, "migrations not applied, database may be unreachable");
            }
            AppState::postgres(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store with bundled lessons");
            AppState::in_memory()
        }
    };

    if cfg.seed_reset {
        reset_store(&state, cfg.seed_file.as_deref()).await;
    } else if let Some(path) = &cfg.seed_file {
        match seed::seed_from_file(state.lessons.as_ref(), path).await {
            Ok(report) => tracing::info!(
                inserted = report.inserted,
                skipped = report.skipped,
                path = %path.display(),
                "seed complete"
            ),
            Err(e) => tracing::error!(error = %e, path = %path.display(), "seeding failed"),
        }
    }
    Ok(state)
}

/// Wipes progress and lessons, then reseeds from `seed_file` or the bundled lessons.
pub async fn reset_store(state: &AppState, seed_file: Option<&Path>) {
    let lessons = match seed_file {
        Some(path) => match seed::read_seed_file(path).await {
            Ok(lessons) => lessons,
            Err(e) => {
                // leave existing data alone when the replacement is unreadable
                tracing::error!(error = %e, path = %path.display(), "reset skipped");
                return;
            }
        },
        None => BuiltinFixtures.lessons(),
    };
    match seed::reset_and_seed(state.lessons.as_ref(), state.progress.as_ref(), &lessons).await {
        Ok(report) => tracing::info!(
            cleared_progress = report.cleared_progress,
            cleared_lessons = report.cleared_lessons,
            inserted = report.seeded.inserted,
            "reset complete"
        ),
        Err(e) => tracing::error!(error = %e, "reset failed"),
    }
}
