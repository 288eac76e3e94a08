//! GetFeeHistoryHandler - Query handler for projected fee periods.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::billing::{project_history, PeriodRecord};
use crate::domain::foundation::MembershipId;
use crate::domain::membership::MembershipError;
use crate::ports::{Clock, MembershipStore, SettingsStore};

/// Query for a membership's fee history.
#[derive(Debug, Clone)]
pub struct GetFeeHistoryQuery {
    pub membership_id: MembershipId,
    /// Defaults to the hall's local date.
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct GetFeeHistoryResult {
    pub membership_id: MembershipId,
    pub records: Vec<PeriodRecord>,
}

pub struct GetFeeHistoryHandler {
    memberships: Arc<dyn MembershipStore>,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    utc_offset_minutes: i32,
}

impl GetFeeHistoryHandler {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            memberships,
            settings,
            clock,
            utc_offset_minutes: 0,
        }
    }

    /// Take default dates from the hall's local calendar.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub async fn handle(&self, query: GetFeeHistoryQuery) -> Result<GetFeeHistoryResult, MembershipError> {
        let membership = self
            .memberships
            .get(&query.membership_id)
            .await?
            .ok_or(MembershipError::not_found(query.membership_id))?;
        let settings = self.settings.load().await?;
        let today = query.today
            .unwrap_or_else(|| self.clock.now().date_at_offset(self.utc_offset_minutes));

        let records = project_history(
            membership.registration_date,
            &membership.payments,
            &settings.price_table,
            &membership.slot,
            today,
        )?;

        Ok(GetFeeHistoryResult {
            membership_id: membership.id,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::test_support::{date, Fixture};
    use crate::domain::billing::PeriodStatus;
    use crate::domain::foundation::{Amount, ErrorCode, SeatNumber, Slot};
    use crate::domain::membership::Membership;

    fn handler(f: &Fixture) -> GetFeeHistoryHandler {
        GetFeeHistoryHandler::new(
            Arc::new(f.memberships.clone()),
            Arc::new(f.settings.clone()),
            f.clock.clone(),
        )
    }

    #[tokio::test]
    async fn history_marks_paid_then_upcoming() {
        let f = Fixture::new(date(2024, 1, 15));
        let mut m = Membership::register(
            MembershipId::new(),
            "Asha",
            None,
            SeatNumber::new(5).unwrap(),
            Slot::new("Morning").unwrap(),
            date(2024, 1, 1),
        )
        .unwrap();
        m.record_payment(date(2024, 1, 1), Amount::new(900).unwrap()).unwrap();
        f.memberships.save(&m).await.unwrap();

        let result = handler(&f)
            .handle(GetFeeHistoryQuery {
                membership_id: m.id,
                today: None,
            })
            .await
            .unwrap();

        let statuses: Vec<PeriodStatus> = result.records.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![PeriodStatus::Paid, PeriodStatus::Upcoming]);
        assert_eq!(result.records[0].paid_date, Some(date(2024, 1, 1)));
        assert_eq!(result.records[1].amount.value(), 900);
    }

    #[tokio::test]
    async fn unknown_membership_is_not_found() {
        let f = Fixture::new(date(2024, 1, 15));
        let err = handler(&f)
            .handle(GetFeeHistoryQuery {
                membership_id: MembershipId::new(),
                today: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MembershipNotFound);
    }
}
