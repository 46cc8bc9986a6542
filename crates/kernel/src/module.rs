//! The unit of composition for a shelf process.
//!
//! A process runs its modules through one fixed sequence: `init` for every
//! module, then the database migrations they contribute, then `start`, then
//! the HTTP server on the merged `routes`, and `stop` once the server exits.

use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Borrowed view of process state handed to the lifecycle hooks.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// Schema migration contributed by a module.
///
/// `up` may hold several SQL statements; it is applied as one unit and
/// recorded under `(module name, id)`, so an id must never be reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A self-contained slice of the application: its routes, its OpenAPI
/// fragment, its schema and its lifecycle hooks.
///
/// Every hook has a no-op default.
#[async_trait]
pub trait Module: Sync + Send {
    /// Registry key and migration namespace.
    fn name(&self) -> &'static str;

    /// Runs before any migration, so the schema may not exist yet.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes relative to the API base path; `build_router` nests them.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI `paths` and `components.schemas`, with paths relative to the
    /// API base path.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Runs once the schema is current and before the listener binds.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs after the server has drained, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
