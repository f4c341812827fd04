use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{User, UserRole};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::traits::UserStorage;

/// Repository for staff users
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn user_from_row(row: &SqliteRow) -> Result<User> {
        let role: String = row.get("role");
        Ok(User {
            id: row.get("id"),
            name: row.get("name"),
            role: UserRole::parse(&role).ok_or_else(|| anyhow!("Unknown user role: {}", role))?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, role, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        let rows = match role {
            Some(role) => {
                sqlx::query(
                    r#"
                    SELECT id, name, role, created_at, updated_at
                    FROM users
                    WHERE role = ?
                    ORDER BY name ASC
                    "#,
                )
                .bind(role.as_str())
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, name, role, created_at, updated_at
                    FROM users
                    ORDER BY name ASC
                    "#,
                )
                .fetch_all(self.db.pool())
                .await?
            }
        };

        rows.iter().map(Self::user_from_row).collect()
    }
}
