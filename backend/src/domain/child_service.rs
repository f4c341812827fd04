use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::storage::ChildStorage;
use shared::{Child, ChildListResponse, ChildResponse, CreateChildRequest};

const MAX_NAME_LENGTH: usize = 100;

/// Service for the children reference list
#[derive(Clone)]
pub struct ChildService {
    storage: Arc<dyn ChildStorage>,
}

impl ChildService {
    pub fn new(storage: Arc<dyn ChildStorage>) -> Self {
        Self { storage }
    }

    /// Create a new child
    pub async fn create_child(&self, request: CreateChildRequest) -> Result<ChildResponse> {
        info!("Creating child: name={}", request.name);

        self.validate_create_request(&request)?;

        let now = Utc::now().to_rfc3339();
        let child = Child {
            id: Child::generate_id(),
            name: request.name.trim().to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        self.storage.store_child(&child).await?;

        info!("Created child: {} with ID: {}", child.name, child.id);

        Ok(ChildResponse {
            child,
            success_message: "Child created successfully".to_string(),
        })
    }

    /// Get a child by ID
    pub async fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        let child = self.storage.get_child(child_id).await?;
        if child.is_none() {
            warn!("Child not found: {}", child_id);
        }
        Ok(child)
    }

    /// List all children, alphabetically
    pub async fn list_children(&self) -> Result<ChildListResponse> {
        let children = self.storage.list_children().await?;

        info!("Found {} children", children.len());

        Ok(ChildListResponse { children })
    }

    fn validate_create_request(&self, request: &CreateChildRequest) -> Result<()> {
        if request.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Child name cannot be empty"));
        }

        if request.name.trim().chars().count() > MAX_NAME_LENGTH {
            return Err(anyhow::anyhow!("Child name cannot exceed 100 characters"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ChildRepository, DbConnection};

    async fn setup_test() -> ChildService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        ChildService::new(Arc::new(ChildRepository::new(db)))
    }

    #[tokio::test]
    async fn test_create_child() {
        let service = setup_test().await;

        let response = service
            .create_child(CreateChildRequest { name: "  Ava Jones ".to_string() })
            .await
            .expect("Failed to create child");

        assert_eq!(response.child.name, "Ava Jones");
        assert!(response.child.id.starts_with("child::"));
        assert_eq!(response.success_message, "Child created successfully");

        let found = service.get_child(&response.child.id).await.unwrap();
        assert_eq!(found, Some(response.child));
    }

    #[tokio::test]
    async fn test_create_child_validation() {
        let service = setup_test().await;

        assert!(service.create_child(CreateChildRequest { name: "   ".to_string() }).await.is_err());
        assert!(service.create_child(CreateChildRequest { name: "a".repeat(101) }).await.is_err());
        assert!(service.create_child(CreateChildRequest { name: "a".repeat(100) }).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_children() {
        let service = setup_test().await;
        for name in ["Noah", "Ava"] {
            service.create_child(CreateChildRequest { name: name.to_string() }).await.unwrap();
        }

        let response = service.list_children().await.unwrap();
        let names: Vec<&str> = response.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ava", "Noah"]);
    }
}
