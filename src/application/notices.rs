//! Building rendered notices from memberships.

use chrono::NaiveDate;

use crate::domain::foundation::{Amount, SeatNumber, Slot};
use crate::domain::membership::Membership;
use crate::domain::notification::{
    Notification, NotificationCategory, TemplateContext, TemplateSet,
};

/// Placeholder values describing one membership.
///
/// `amount` is omitted when unknown, which leaves `{{amount}}` verbatim.
pub fn member_context(
    membership: &Membership,
    amount: Option<Amount>,
    today: NaiveDate,
) -> TemplateContext {
    let context = TemplateContext::new()
        .with("name", &membership.name)
        .with("memberId", membership.id)
        .with("seatNumber", membership.seat_number)
        .with("slot", &membership.slot)
        .with("dueDate", membership.next_due_date)
        .with("daysLeft", membership.days_until_due(today));

    match amount {
        Some(amount) => context.with("amount", amount),
        None => context,
    }
}

/// Render a notice addressed to the member.
pub fn member_notice(
    templates: &TemplateSet,
    category: NotificationCategory,
    membership: &Membership,
    amount: Option<Amount>,
    today: NaiveDate,
) -> Notification {
    let body = templates.render(category, &member_context(membership, amount, today));
    Notification::new(category, membership.contact.clone(), body)
}

/// A seat taken back from a terminated membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclaimedSeat {
    pub seat: SeatNumber,
    pub slot: Slot,
    pub name: String,
}

/// Operator digest listing the seats reclaimed on `today`.
pub fn admin_digest(templates: &TemplateSet, reclaimed: &[ReclaimedSeat], today: NaiveDate) -> Notification {
    let lines: Vec<String> = reclaimed
        .iter()
        .map(|r| format!("- seat {} ({}) from {}", r.seat, r.slot, r.name))
        .collect();
    let summary = format!(
        "{} seat(s) reclaimed on {}:\n{}",
        reclaimed.len(),
        today,
        lines.join("\n")
    );

    let context = TemplateContext::new().with("summary", summary);
    Notification::new(
        NotificationCategory::Admin,
        None,
        templates.render(NotificationCategory::Admin, &context),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MembershipId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member() -> Membership {
        Membership::register(
            MembershipId::new(),
            "Asha",
            Some("asha@example.com".to_string()),
            SeatNumber::new(5).unwrap(),
            Slot::new("Morning").unwrap(),
            date(2024, 2, 1),
        )
        .unwrap()
    }

    #[test]
    fn context_carries_member_fields() {
        let m = member();
        let ctx = member_context(&m, Some(Amount::new(900).unwrap()), date(2024, 1, 29));

        assert_eq!(ctx.get("name"), Some("Asha"));
        assert_eq!(ctx.get("seatNumber"), Some("5"));
        assert_eq!(ctx.get("slot"), Some("Morning"));
        assert_eq!(ctx.get("dueDate"), Some("2024-02-01"));
        assert_eq!(ctx.get("daysLeft"), Some("3"));
        assert_eq!(ctx.get("amount"), Some("900"));
        assert_eq!(ctx.get("memberId"), Some(m.id.to_string().as_str()));
    }

    #[test]
    fn unknown_amount_stays_as_placeholder() {
        let templates = TemplateSet {
            reminder: "{{name}} owes {{amount}}".to_string(),
            ..Default::default()
        };
        let notice = member_notice(
            &templates,
            NotificationCategory::Reminder,
            &member(),
            None,
            date(2024, 1, 29),
        );

        assert_eq!(notice.body, "Asha owes {{amount}}");
        assert_eq!(notice.recipient.as_deref(), Some("asha@example.com"));
    }

    #[test]
    fn digest_lists_each_seat() {
        let reclaimed = vec![
            ReclaimedSeat {
                seat: SeatNumber::new(5).unwrap(),
                slot: Slot::new("Morning").unwrap(),
                name: "Asha".to_string(),
            },
            ReclaimedSeat {
                seat: SeatNumber::new(8).unwrap(),
                slot: Slot::new("Evening").unwrap(),
                name: "Ravi".to_string(),
            },
        ];

        let notice = admin_digest(&TemplateSet::default(), &reclaimed, date(2024, 2, 4));

        assert_eq!(notice.category, NotificationCategory::Admin);
        assert!(notice.recipient.is_none());
        assert!(notice.body.starts_with("2 seat(s) reclaimed on 2024-02-04"));
        assert!(notice.body.contains("- seat 8 (Evening) from Ravi"));
    }
}
