use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::storage::UserStorage;
use shared::{CreateUserRequest, User, UserListResponse, UserResponse, UserRole};

/// Service for staff users. There is no login: staff pick themselves from these lists.
#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn UserStorage>,
}

impl UserService {
    pub fn new(storage: Arc<dyn UserStorage>) -> Self {
        Self { storage }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse> {
        info!("Creating user: name={}, role={}", request.name, request.role);

        let name = request.name.trim();
        if name.is_empty() {
            return Err(anyhow::anyhow!("User name cannot be empty"));
        }
        if name.chars().count() > 100 {
            return Err(anyhow::anyhow!("User name cannot exceed 100 characters"));
        }

        let now = Utc::now().to_rfc3339();
        let user = User {
            id: User::generate_id(),
            name: name.to_string(),
            role: request.role,
            created_at: now.clone(),
            updated_at: now,
        };

        self.storage.store_user(&user).await?;

        Ok(UserResponse {
            user,
            success_message: "User created successfully".to_string(),
        })
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.storage.get_user(user_id).await
    }

    /// List users, optionally only those holding `role`
    pub async fn list_users(&self, role: Option<UserRole>) -> Result<UserListResponse> {
        let users = self.storage.list_users(role).await?;

        info!("Found {} users (role filter: {:?})", users.len(), role);

        Ok(UserListResponse { users })
    }
}
