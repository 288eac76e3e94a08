//! In-memory seat store with a fixed, pre-provisioned pool.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SeatNumber};
use crate::domain::seat::Seat;
use crate::ports::SeatStore;

/// In-memory storage for seats.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeatStore {
    seats: Arc<RwLock<BTreeMap<SeatNumber, Seat>>>,
}

impl InMemorySeatStore {
    /// Create a store with seats `1..=capacity`, all available.
    pub fn with_capacity(capacity: u32) -> Self {
        let seats = (1..=capacity)
            .filter_map(|n| SeatNumber::new(n).ok())
            .map(|number| (number, Seat::new(number)))
            .collect();
        Self {
            seats: Arc::new(RwLock::new(seats)),
        }
    }

    /// Number of provisioned seats.
    pub async fn capacity(&self) -> usize {
        self.seats.read().await.len()
    }

    /// Admin removal of a seat from the pool.
    ///
    /// Returns `false` if the seat does not exist.
    pub async fn remove(&self, number: SeatNumber) -> bool {
        self.seats.write().await.remove(&number).is_some()
    }
}

#[async_trait]
impl SeatStore for InMemorySeatStore {
    async fn get(&self, number: SeatNumber) -> Result<Option<Seat>, DomainError> {
        Ok(self.seats.read().await.get(&number).cloned())
    }

    async fn update(&self, seat: &Seat) -> Result<(), DomainError> {
        let mut seats = self.seats.write().await;
        match seats.get_mut(&seat.number) {
            Some(existing) => {
                *existing = seat.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SeatNotFound,
                format!("Seat {} not found", seat.number),
            )),
        }
    }

    async fn list_all(&self) -> Result<Vec<Seat>, DomainError> {
        Ok(self.seats.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::FeeStatus;
    use crate::domain::foundation::{MembershipId, Slot};

    fn seat(n: u32) -> SeatNumber {
        SeatNumber::new(n).unwrap()
    }

    #[tokio::test]
    async fn provisions_seats_from_one() {
        let store = InMemorySeatStore::with_capacity(3);
        assert_eq!(store.capacity().await, 3);
        assert!(store.get(seat(1)).await.unwrap().is_some());
        assert!(store.get(seat(3)).await.unwrap().is_some());
        assert!(store.get(seat(4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_persists_occupancy() {
        let store = InMemorySeatStore::with_capacity(2);
        let mut s = store.get(seat(2)).await.unwrap().unwrap();
        s.occupy(Slot::new("Morning").unwrap(), MembershipId::new(), FeeStatus::Due)
            .unwrap();
        store.update(&s).await.unwrap();

        let reloaded = store.get(seat(2)).await.unwrap().unwrap();
        assert_eq!(reloaded.occupancies.len(), 1);
    }

    #[tokio::test]
    async fn update_unknown_seat_fails() {
        let store = InMemorySeatStore::with_capacity(1);
        let err = store.update(&Seat::new(seat(9))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SeatNotFound);
    }

    #[tokio::test]
    async fn removed_seat_is_gone() {
        let store = InMemorySeatStore::with_capacity(2);
        assert!(store.remove(seat(2)).await);
        assert!(!store.remove(seat(2)).await);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
