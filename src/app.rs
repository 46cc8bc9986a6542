//! Process bootstrap shared by the `shelf` binary and `shelf-cli`.

use std::sync::Arc;

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{self, books::PgBookStore, books::SharedBookStore};

/// Registry holding every application module, backed by `store`.
pub fn build_registry(store: SharedBookStore) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Connect, migrate, and serve until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let pool = shelf_db::connect(&settings.database).await?;
    let registry = build_registry(Arc::new(PgBookStore::new(pool.clone())));
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;

    let applied = shelf_db::run_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");

    registry.start_modules(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;
    let stopped = registry.stop_modules().await;
    pool.close().await;

    shutdown_outcome(served, stopped)
}

/// A server failure outranks a failure to stop; the stop error is only
/// reported when serving succeeded.
fn shutdown_outcome(
    served: anyhow::Result<()>,
    stopped: anyhow::Result<()>,
) -> anyhow::Result<()> {
    match (served, stopped) {
        (Err(served), Err(stopped)) => {
            tracing::error!(error = %format!("{stopped:#}"), "failed to stop modules");
            Err(served)
        }
        (served, stopped) => served.and(stopped),
    }
}

/// Apply pending migrations and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = shelf_db::connect(&settings.database).await?;
    let registry = build_registry(Arc::new(PgBookStore::new(pool.clone())));

    let applied = shelf_db::run_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    pool.close().await;

    Ok(applied)
}
