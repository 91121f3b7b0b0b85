use std::fmt::Display;
use std::str::FromStr;

use anyhow::{bail, Context};
use speakwell_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that gates every data-modifying script.
pub const CONFIRM_VAR: &str = "CONFIRM_MIGRATION";

/// Inter-write delay used by scripts unless `SESSION_WRITE_DELAY_MS` is set.
pub const DEFAULT_WRITE_DELAY_MS: u64 = 100;

/// Load `.env` and install the fmt subscriber with `default_filter` as the
/// fallback when `RUST_LOG` is unset.
pub fn init(default_filter: &str) {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// `true` only for an explicit, case-insensitive `"true"`.
pub fn is_confirmed(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Fail unless [`CONFIRM_VAR`] is set to `true`.
pub fn require_confirmation(script: &str) -> anyhow::Result<()> {
    let value = std::env::var(CONFIRM_VAR).ok();
    if !is_confirmed(value.as_deref()) {
        bail!("{script} modifies data; re-run with {CONFIRM_VAR}=true to proceed");
    }
    Ok(())
}

/// Read a required environment variable.
pub fn required_var(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

/// Parse an optional environment variable. Unset or empty yields `None`.
pub fn optional_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{name} is invalid: {e}")),
        _ => Ok(None),
    }
}

/// Connect using `DATABASE_URL` and apply pending migrations.
pub async fn connect_database() -> anyhow::Result<DbPool> {
    let database_url = required_var("DATABASE_URL")?;
    let pool = speakwell_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    speakwell_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database connected, migrations applied");
    Ok(pool)
}

/// Whether `err` is a unique-constraint violation ("already exists").
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
