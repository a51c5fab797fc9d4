//! Run database migrations.

use tracing::info;

use shortcakes_server::db;

/// Apply pending migrations from `crates/server/migrations`.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    sqlx::migrate!("../server/migrations").run(&pool).await?;
    info!("Migrations applied");

    Ok(())
}
