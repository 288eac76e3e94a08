//! LeaveMembershipHandler - Command handler for archiving a membership.

use std::sync::Arc;

use tracing::info;

use crate::application::seating::SeatCoordinator;
use crate::domain::foundation::MembershipId;
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::MembershipStore;

/// Command to mark a membership as left.
#[derive(Debug, Clone)]
pub struct LeaveMembershipCommand {
    pub membership_id: MembershipId,
}

#[derive(Debug, Clone)]
pub struct LeaveMembershipResult {
    pub membership: Membership,
    /// False when the membership had already left.
    pub newly_left: bool,
    pub seat_released: bool,
}

/// Handler for leaving.
///
/// Leaving twice succeeds; the second call only retries the seat release.
pub struct LeaveMembershipHandler {
    memberships: Arc<dyn MembershipStore>,
    seating: Arc<SeatCoordinator>,
}

impl LeaveMembershipHandler {
    pub fn new(memberships: Arc<dyn MembershipStore>, seating: Arc<SeatCoordinator>) -> Self {
        Self {
            memberships,
            seating,
        }
    }

    pub async fn handle(
        &self,
        cmd: LeaveMembershipCommand,
    ) -> Result<LeaveMembershipResult, MembershipError> {
        let mut membership = self
            .memberships
            .get(&cmd.membership_id)
            .await?
            .ok_or(MembershipError::not_found(cmd.membership_id))?;

        let newly_left = membership.leave();
        if newly_left {
            self.memberships.update(&membership).await?;
        }

        let seat_released = self
            .seating
            .release(membership.seat_number, membership.id)
            .await?;

        if newly_left {
            info!(
                membership_id = %membership.id,
                seat = %membership.seat_number,
                "Membership left"
            );
        }

        Ok(LeaveMembershipResult {
            membership,
            newly_left,
            seat_released,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::test_support::{date, Fixture};
    use crate::domain::foundation::{ErrorCode, SeatNumber, Slot};
    use crate::domain::membership::MembershipState;
    use crate::ports::SeatStore;

    async fn member(f: &Fixture) -> Membership {
        let m = Membership::register(
            MembershipId::new(),
            "Ravi",
            None,
            SeatNumber::new(3).unwrap(),
            Slot::new("Evening").unwrap(),
            date(2024, 1, 1),
        )
        .unwrap();
        f.seating.reserve(m.seat_number, m.id, &m.slot).await.unwrap();
        f.memberships.save(&m).await.unwrap();
        m
    }

    fn handler(f: &Fixture) -> LeaveMembershipHandler {
        LeaveMembershipHandler::new(Arc::new(f.memberships.clone()), f.seating.clone())
    }

    #[tokio::test]
    async fn leaving_archives_and_frees_seat() {
        let f = Fixture::new(date(2024, 1, 10));
        let m = member(&f).await;

        let result = handler(&f)
            .handle(LeaveMembershipCommand { membership_id: m.id })
            .await
            .unwrap();

        assert!(result.newly_left);
        assert!(result.seat_released);
        let stored = f.memberships.get(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.state, MembershipState::Left);
        assert!(f.seats.get(m.seat_number).await.unwrap().unwrap().is_vacant());
    }

    #[tokio::test]
    async fn leaving_twice_is_silent() {
        let f = Fixture::new(date(2024, 1, 10));
        let m = member(&f).await;
        let h = handler(&f);
        h.handle(LeaveMembershipCommand { membership_id: m.id })
            .await
            .unwrap();

        let again = h
            .handle(LeaveMembershipCommand { membership_id: m.id })
            .await
            .unwrap();

        assert!(!again.newly_left);
        assert!(!again.seat_released);
    }

    #[tokio::test]
    async fn unknown_membership_is_not_found() {
        let f = Fixture::new(date(2024, 1, 10));
        let err = handler(&f)
            .handle(LeaveMembershipCommand {
                membership_id: MembershipId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MembershipNotFound);
    }
}
