//! Membership store port.
//!
//! Defines the contract for persisting and retrieving Membership
//! aggregates. The engine treats storage as an abstract key-indexed store;
//! implementations own transactions, retries, and timeouts.
//!
//! # Example
//!
//! ```ignore
//! async fn pay(store: &dyn MembershipStore, id: &MembershipId, on: NaiveDate, amount: Amount)
//!     -> Result<(), DomainError>
//! {
//!     let mut membership = store.get(id).await?.ok_or_else(|| ...)?;
//!     membership.record_payment(on, amount)?;
//!     store.update(&membership).await
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MembershipId};
use crate::domain::membership::Membership;

/// Store port for Membership aggregate persistence.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Load every membership, active and left.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` when the backing store cannot be read
    async fn list_all(&self) -> Result<Vec<Membership>, DomainError>;

    /// Find a membership by its ID.
    ///
    /// Returns `None` if not found.
    async fn get(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError>;

    /// Save a new membership.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the id already exists
    /// - `StoreUnavailable` on persistence failure
    async fn save(&self, membership: &Membership) -> Result<(), DomainError>;

    /// Replace an existing membership.
    ///
    /// # Errors
    ///
    /// - `MembershipNotFound` if the membership doesn't exist
    /// - `StoreUnavailable` on persistence failure
    async fn update(&self, membership: &Membership) -> Result<(), DomainError>;
}
