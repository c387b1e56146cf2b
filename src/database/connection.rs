use crate::{config::DatabaseConfig, error::Result};
use sqlx::{PgPool, migrate::Migrator, postgres::PgPoolOptions};

static MIGRATOR: Migrator = sqlx::migrate!();

/// Connects and brings the `products` / `product_images` schema up to date.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("Catalog schema at migration {}", latest_migration(&MIGRATOR));

    tracing::info!(
        "Database connection established with {} max connections",
        config.max_connections
    );

    Ok(pool)
}

pub async fn check_health(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

fn latest_migration(migrator: &Migrator) -> i64 {
    migrator.iter().map(|migration| migration.version).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_migrations_create_the_catalog_tables() {
        let sql: String = MIGRATOR.iter().map(|m| m.sql.to_string()).collect();
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS products"));
        assert!(sql.contains("image VARCHAR(255)"));
        assert!(sql.contains("ON DELETE CASCADE"));
        assert!(latest_migration(&MIGRATOR) >= 20250101000000);
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires database"]
    async fn migrations_apply_to_an_empty_database(pool: PgPool) {
        MIGRATOR.run(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_name IN ('products', 'product_images')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 2);
    }
}
