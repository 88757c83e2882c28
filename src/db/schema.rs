use sqlx::{PgPool, Postgres, Transaction};

use crate::auth::password::digest_password;

pub const DEMO_USERNAME: &str = "user123";
pub const DEMO_PASSWORD: &str = "password123";

/// Advisory lock key held while the schema is created, so instances starting
/// together do not race on the catalog.
const SCHEMA_LOCK_KEY: i64 = 0x7765_6c6c_6e65_7373;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(255) UNIQUE NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_WELLNESS_ENTRIES: &str = r#"
    CREATE TABLE IF NOT EXISTS wellness_entries (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        date DATE NOT NULL,
        mood INTEGER CHECK (mood >= 1 AND mood <= 10),
        sleep DECIMAL(4,2),
        stress INTEGER CHECK (stress >= 1 AND stress <= 4),
        journal TEXT,
        activities TEXT[],
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(user_id, date)
    )
"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_wellness_entries_user_id ON wellness_entries(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_wellness_entries_date ON wellness_entries(date)",
];

/// Create both tables and indexes if absent and seed the demo account.
/// Safe to run any number of times, including concurrently.
pub async fn initialize(db: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing database schema");

    let mut tx = db.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    sqlx::query(CREATE_USERS).execute(&mut *tx).await?;
    tracing::info!(table = "users", "Table ready");

    sqlx::query(CREATE_WELLNESS_ENTRIES).execute(&mut *tx).await?;
    tracing::info!(table = "wellness_entries", "Table ready");

    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tracing::info!("Indexes ready");

    let inserted = seed_demo_user(&mut tx).await?;
    tracing::info!(
        username = DEMO_USERNAME,
        created = inserted,
        "Demo user ready"
    );

    tx.commit().await?;
    tracing::info!("Database initialization completed");
    Ok(())
}

/// Returns whether a new row was written.
async fn seed_demo_user(tx: &mut Transaction<'_, Postgres>) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(DEMO_USERNAME)
    .bind(digest_password(DEMO_PASSWORD))
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent() {
        assert!(CREATE_USERS.contains("IF NOT EXISTS users"));
        assert!(CREATE_WELLNESS_ENTRIES.contains("IF NOT EXISTS wellness_entries"));
        for statement in CREATE_INDEXES {
            assert!(statement.contains("IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_entries_table_enforces_one_entry_per_day() {
        assert!(CREATE_WELLNESS_ENTRIES.contains("UNIQUE(user_id, date)"));
        assert!(CREATE_WELLNESS_ENTRIES.contains("ON DELETE CASCADE"));
    }
}
