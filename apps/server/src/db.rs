use sqlx::SqlitePool;

pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    // Enable WAL mode for better concurrent access
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(pool)
        .await?;

    // Create migrations tracking table
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .execute(pool)
    .await?;

    // 001: base schema, including the partial unique index that backs
    // slot exclusivity (one non-cancelled appointment per professional/date/time)
    let applied: bool =
        sqlx::query_scalar("SELECT COUNT(*) > 0 FROM _migrations WHERE name = '001_init'")
            .fetch_one(pool)
            .await?;

    if !applied {
        let migration_sql = include_str!("../migrations/001_init.sql");
        for statement in migration_sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(pool).await?;
            }
        }
        sqlx::query("INSERT INTO _migrations (name) VALUES ('001_init')")
            .execute(pool)
            .await?;
        tracing::info!("Applied migration: 001_init");
    }

    // 002: query-path indexes (agenda views and availability reads)
    let indexes_applied: bool =
        sqlx::query_scalar("SELECT COUNT(*) > 0 FROM _migrations WHERE name = '002_indexes'")
            .fetch_one(pool)
            .await?;

    if !indexes_applied {
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_appointments_salon_date ON appointments(salon_id, date)",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_appointments_professional_date ON appointments(professional_id, date)",
        )
        .execute(pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_professionals_salon ON professionals(salon_id)")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_services_salon ON services(salon_id)")
            .execute(pool)
            .await?;

        sqlx::query("INSERT INTO _migrations (name) VALUES ('002_indexes')")
            .execute(pool)
            .await?;
        tracing::info!("Applied migration: 002_indexes");
    }

    tracing::info!("Database migrations up to date");
    Ok(())
}
