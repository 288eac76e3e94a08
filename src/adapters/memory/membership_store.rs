//! In-memory membership store.
//!
//! Backs the daemon binary and the tests. Data lives only as long as the
//! process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, MembershipId};
use crate::domain::membership::Membership;
use crate::ports::MembershipStore;

/// In-memory storage for memberships.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipStore {
    memberships: Arc<RwLock<HashMap<MembershipId, Membership>>>,
}

impl InMemoryMembershipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored memberships.
    pub async fn len(&self) -> usize {
        self.memberships.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memberships.read().await.is_empty()
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn list_all(&self) -> Result<Vec<Membership>, DomainError> {
        let memberships = self.memberships.read().await;
        let mut all: Vec<Membership> = memberships.values().cloned().collect();
        all.sort_by_key(|m| (m.seat_number, m.created_at));
        Ok(all)
    }

    async fn get(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError> {
        Ok(self.memberships.read().await.get(id).cloned())
    }

    async fn save(&self, membership: &Membership) -> Result<(), DomainError> {
        let mut memberships = self.memberships.write().await;
        if memberships.contains_key(&membership.id) {
            return Err(DomainError::validation(
                "id",
                format!("Membership {} already exists", membership.id),
            ));
        }
        memberships.insert(membership.id, membership.clone());
        Ok(())
    }

    async fn update(&self, membership: &Membership) -> Result<(), DomainError> {
        let mut memberships = self.memberships.write().await;
        match memberships.get_mut(&membership.id) {
            Some(existing) => {
                *existing = membership.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::MembershipNotFound,
                format!("Membership {} not found", membership.id),
            )),
        }
    }
}
