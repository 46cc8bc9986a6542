//! PostgreSQL pool factory and the module migration runner.

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use shelf_kernel::settings::DatabaseSettings;
use shelf_kernel::Migration;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

const MIGRATIONS_TABLE_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS shelf_migrations (
        module     TEXT        NOT NULL,
        id         TEXT        NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    )
"#;

/// Translate database settings into driver connect options.
pub fn connect_options(settings: &DatabaseSettings) -> anyhow::Result<PgConnectOptions> {
    let ssl_mode = PgSslMode::from_str(&settings.ssl_mode)
        .with_context(|| format!("invalid database ssl_mode '{}'", settings.ssl_mode))?;

    let mut options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .database(&settings.name)
        .ssl_mode(ssl_mode);

    if !settings.password.is_empty() {
        options = options.password(&settings.password);
    }

    Ok(options)
}

/// Open a connection pool and verify it can hand out a connection.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let options = connect_options(settings)?;

    tracing::info!(
        target: "shelf-db",
        db = %settings.display_target(),
        max_connections = settings.max_connections,
        "connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to {}", settings.display_target()))
}

/// Apply every migration not yet recorded in `shelf_migrations`.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row. Returns the number of migrations applied.
pub async fn run_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::query(MIGRATIONS_TABLE_DDL)
        .execute(pool)
        .await
        .context("failed to create migrations table")?;

    let applied: Vec<(String, String)> = sqlx::query_as("SELECT module, id FROM shelf_migrations")
        .fetch_all(pool)
        .await
        .context("failed to read applied migrations")?;
    let applied: HashSet<(String, String)> = applied.into_iter().collect();

    let pending = pending_migrations(migrations, &applied);
    if pending.is_empty() {
        tracing::info!(target: "shelf-db", "database schema is up to date");
        return Ok(0);
    }

    for (module, migration) in &pending {
        let mut tx = pool.begin().await.context("failed to open transaction")?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;

        sqlx::query("INSERT INTO shelf_migrations (module, id) VALUES ($1, $2)")
            .bind(module.as_str())
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;

        tx.commit()
            .await
            .with_context(|| format!("failed to commit migration {}/{}", module, migration.id))?;

        tracing::info!(
            target: "shelf-db",
            module = %module,
            migration = migration.id,
            "migration applied"
        );
    }

    Ok(pending.len())
}

fn pending_migrations<'a>(
    migrations: &'a [(String, Migration)],
    applied: &HashSet<(String, String)>,
) -> Vec<&'a (String, Migration)> {
    migrations
        .iter()
        .filter(|(module, migration)| {
            !applied.contains(&(module.clone(), migration.id.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migration(id: &'static str) -> Migration {
        Migration {
            id,
            up: "SELECT 1;",
        }
    }

    #[test]
    fn connect_options_carry_settings() {
        let settings = DatabaseSettings {
            host: "db.internal".to_string(),
            port: 6543,
            user: "books".to_string(),
            name: "catalogue".to_string(),
            ..DatabaseSettings::default()
        };

        let options = connect_options(&settings).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "books");
        assert_eq!(options.get_database(), Some("catalogue"));
    }

    #[test]
    fn connect_options_reject_unknown_ssl_mode() {
        let settings = DatabaseSettings {
            ssl_mode: "sometimes".to_string(),
            ..DatabaseSettings::default()
        };

        let err = connect_options(&settings).unwrap_err();
        assert!(err.to_string().contains("invalid database ssl_mode 'sometimes'"));
    }

    #[test]
    fn pending_skips_applied_migrations() {
        let migrations = vec![
            ("books".to_string(), migration("001_create_books")),
            ("books".to_string(), migration("002_more")),
            ("other".to_string(), migration("001_create_books")),
        ];
        let applied: HashSet<(String, String)> =
            [("books".to_string(), "001_create_books".to_string())]
                .into_iter()
                .collect();

        let pending: Vec<(&str, &str)> = pending_migrations(&migrations, &applied)
            .into_iter()
            .map(|(module, m)| (module.as_str(), m.id))
            .collect();

        assert_eq!(
            pending,
            vec![("books", "002_more"), ("other", "001_create_books")]
        );
    }
}
