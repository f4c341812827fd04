use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// DbConnection owns the SQLite pool shared by every repository
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and make sure the schema exists
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS children (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_children_name
            ON children(name);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('Teacher', 'Front Desk')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS injury_reports (
                id TEXT PRIMARY KEY,
                child_id TEXT NOT NULL REFERENCES children (id),
                submitting_user_id TEXT NOT NULL REFERENCES users (id),
                injury_timestamp TEXT NOT NULL,
                location TEXT NOT NULL,
                incident_description TEXT NOT NULL,
                injury_description TEXT NOT NULL,
                action_taken TEXT NOT NULL,
                is_bite BOOLEAN NOT NULL DEFAULT FALSE,
                biter_child_id TEXT REFERENCES children (id),
                is_peer_aggression BOOLEAN NOT NULL DEFAULT FALSE,
                aggressor_child_id TEXT REFERENCES children (id),
                is_reviewed BOOLEAN NOT NULL DEFAULT FALSE,
                reviewed_by_user_id TEXT REFERENCES users (id),
                reviewed_timestamp TEXT,
                is_delivered_to_parent BOOLEAN NOT NULL DEFAULT FALSE,
                delivered_by_user_id TEXT REFERENCES users (id),
                delivered_timestamp TEXT,
                parent_narrative TEXT,
                memo_content TEXT,
                ai_validated BOOLEAN NOT NULL DEFAULT FALSE,
                ai_suggestions_count INTEGER NOT NULL DEFAULT 0,
                ai_suggestions_accepted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_injury_reports_is_reviewed
            ON injury_reports(is_reviewed);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
