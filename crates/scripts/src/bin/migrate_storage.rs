//! `migrate-storage` -- copy stored objects from the legacy bucket to R2.
//!
//! Objects already present at the destination with the same size are
//! skipped, so the copy can be re-run until it reports no failures.
//!
//! # Environment variables
//!
//! | Variable                       | Required | Default  | Description                     |
//! |--------------------------------|----------|----------|---------------------------------|
//! | `CONFIRM_MIGRATION`            | yes      | --       | Must be `true`                  |
//! | `SOURCE_S3_BUCKET`             | yes      | --       | Source bucket                   |
//! | `SOURCE_S3_ENDPOINT`           | no       | AWS      | Source endpoint URL             |
//! | `SOURCE_S3_REGION`             | no       | `auto`   | Source region                   |
//! | `SOURCE_S3_ACCESS_KEY_ID`      | no       | env/IMDS | Source credentials              |
//! | `SOURCE_S3_SECRET_ACCESS_KEY`  | no       | env/IMDS | Source credentials              |
//! | `R2_BUCKET`                    | yes      | --       | Destination bucket              |
//! | `R2_ENDPOINT`                  | yes      | --       | `https://<account>.r2.cloudflarestorage.com` |
//! | `R2_ACCESS_KEY_ID`             | yes      | --       | Destination credentials         |
//! | `R2_SECRET_ACCESS_KEY`         | yes      | --       | Destination credentials         |
//! | `STORAGE_MIGRATION_PREFIX`     | no       | (all)    | Only copy keys under this prefix |

use anyhow::{bail, Context};
use speakwell_scripts::bootstrap;
use speakwell_storage::{migrate_objects, S3Config, S3ObjectStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init("migrate_storage=info,speakwell_storage=info,speakwell_scripts=info");
    bootstrap::require_confirmation("migrate-storage")?;

    let source_config = S3Config::from_env("SOURCE_S3").context("SOURCE_S3_BUCKET must be set")?;
    let dest_config = S3Config::from_env("R2").context("R2_BUCKET must be set")?;
    if dest_config.endpoint.is_none() {
        bail!("R2_ENDPOINT must be set");
    }
    let prefix: String = bootstrap::optional_var("STORAGE_MIGRATION_PREFIX")?.unwrap_or_default();

    tracing::info!(
        source = %source_config.bucket,
        dest = %dest_config.bucket,
        prefix = %prefix,
        "Starting storage migration",
    );

    let source = S3ObjectStore::connect(&source_config)
        .await
        .context("Failed to configure source bucket")?;
    let dest = S3ObjectStore::connect(&dest_config)
        .await
        .context("Failed to configure destination bucket")?;

    let report = migrate_objects(&source, &dest, &prefix)
        .await
        .context("Failed to list source objects")?;

    for (key, error) in &report.failed {
        tracing::error!(key = %key, error = %error, "Object not copied");
    }
    tracing::info!(
        copied = report.copied.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Storage migration finished",
    );

    if !report.is_success() {
        bail!("{} object(s) failed to copy; re-run to retry", report.failed.len());
    }
    Ok(())
}
