//! ReconciliationScheduler - the recurring fee-lifecycle sweep.
//!
//! Every tick walks all memberships and advances each one at most one step
//! through `paid → due → expired → terminated`:
//!
//! 1. Load memberships and hall settings (failure aborts the tick)
//! 2. Check whether any notification channel is configured
//! 3. Sync tracked fee status with the calendar
//! 4. Classify into reminder / due-today / termination buckets
//! 5. Terminate: persist, release the seat, send the overdue notice
//! 6. Send reminders and due notices
//! 7. Send the admin digest if anything was terminated
//!
//! ## Windows
//!
//! | Bucket | Days until due | Fee status | Guard |
//! |--------|----------------|------------|-------|
//! | Reminder | `1..=reminder_days` | not expired | reminder not yet sent for this due date |
//! | Due | `(-grace, 0]` | not paid | due notice not yet sent for this due date |
//! | Terminate | `<= -grace` | expired | membership still active |
//!
//! Windows rather than exact offsets mean a missed daily tick is caught up
//! by the next one. The notice log keeps repeated ticks from notifying
//! twice.
//!
//! ## Timers
//!
//! `start` spawns a task that fires at the configured daily time and on a
//! fixed backup interval. `stop` signals it through a `watch` channel and
//! waits for the in-flight tick; a tick is never interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::application::notices::{admin_digest, member_notice, ReclaimedSeat};
use crate::application::seating::SeatCoordinator;
use crate::domain::billing::FeeStatus;
use crate::domain::foundation::{MembershipId, Timestamp};
use crate::domain::membership::Membership;
use crate::domain::notification::NotificationCategory;
use crate::ports::{Clock, HallSettings, MembershipStore, Notifier, SettingsStore};

use super::{SchedulerConfig, SchedulerError, SchedulerStatus, TickReport};

/// Clears the in-flight flag when a tick ends, however it ends.
struct ActiveTick<'a>(&'a AtomicBool);

impl<'a> ActiveTick<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ActiveTick<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Reminder,
    DueToday,
    Terminate,
}

struct Worker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Observed {
    last_tick_at: Option<Timestamp>,
    next_scheduled_at: Option<Timestamp>,
    last_report: Option<TickReport>,
}

/// Recurring reconciliation of membership fees and seats.
pub struct ReconciliationScheduler {
    memberships: Arc<dyn MembershipStore>,
    settings: Arc<dyn SettingsStore>,
    notifier: Arc<dyn Notifier>,
    seating: Arc<SeatCoordinator>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    active: AtomicBool,
    observed: RwLock<Observed>,
    worker: Mutex<Option<Worker>>,
}

impl ReconciliationScheduler {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        settings: Arc<dyn SettingsStore>,
        notifier: Arc<dyn Notifier>,
        seating: Arc<SeatCoordinator>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            memberships,
            settings,
            notifier,
            seating,
            clock,
            config,
            active: AtomicBool::new(false),
            observed: RwLock::new(Observed::default()),
            worker: Mutex::new(None),
        }
    }

    /// Start the daily and backup timers.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyStarted` if the timers are running.
    pub async fn start(self: &Arc<Self>) -> Result<(), SchedulerError> {
        let mut worker = self.worker.lock().await;
        if worker.is_some() {
            return Err(SchedulerError::AlreadyStarted);
        }

        let (shutdown, receiver) = watch::channel(false);
        let handle = tokio::spawn(Arc::clone(self).run(receiver));
        *worker = Some(Worker { shutdown, handle });

        info!(
            daily_at = %self.config.daily_at,
            utc_offset_minutes = self.config.utc_offset_minutes,
            backup_interval_secs = self.config.backup_interval.as_secs(),
            "Reconciliation scheduler started"
        );
        Ok(())
    }

    /// Stop the timers, waiting for an in-flight tick to finish.
    ///
    /// Stopping a scheduler that is not running is a no-op.
    pub async fn stop(&self) {
        let Some(worker) = self.worker.lock().await.take() else {
            return;
        };

        let _ = worker.shutdown.send(true);
        if let Err(err) = worker.handle.await {
            error!(error = %err, "Scheduler task ended abnormally");
        }
        self.observed.write().await.next_scheduled_at = None;
        info!("Reconciliation scheduler stopped");
    }

    /// Current health snapshot.
    pub async fn status(&self) -> SchedulerStatus {
        let running = self.worker.lock().await.is_some();
        let observed = self.observed.read().await;
        SchedulerStatus {
            running,
            active: self.active.load(Ordering::Acquire),
            last_tick_at: observed.last_tick_at,
            next_scheduled_at: observed.next_scheduled_at,
            last_report: observed.last_report.clone(),
        }
    }

    /// Run one tick immediately.
    ///
    /// # Errors
    ///
    /// - `AlreadyRunning` if another tick is in flight
    /// - `Store` if memberships or settings could not be loaded
    pub async fn trigger_now(&self) -> Result<TickReport, SchedulerError> {
        let _active = ActiveTick::acquire(&self.active).ok_or(SchedulerError::AlreadyRunning)?;

        let started_at = self.clock.now();
        let result = self.tick(started_at).await;

        let mut observed = self.observed.write().await;
        observed.last_tick_at = Some(started_at);
        match &result {
            Ok(report) => {
                info!(
                    date = ?report.date,
                    examined = report.examined,
                    status_changes = report.status_changes,
                    reminders = report.reminders_sent,
                    due_notices = report.due_notices_sent,
                    terminated = report.terminated_count(),
                    skipped = report.notices_skipped,
                    failures = report.failures,
                    "Reconciliation tick complete"
                );
                observed.last_report = Some(report.clone());
            }
            Err(err) => error!(error = %err, "Reconciliation tick aborted"),
        }
        result
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let backup = self.config.backup_interval;
        let mut backup_timer = time::interval_at(time::Instant::now() + backup, backup);
        backup_timer.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        let mut next_backup_at = self.clock.now().plus_std(backup);

        loop {
            let now = self.clock.now();
            let next_daily_at = self.config.next_daily_run(now);
            self.observed.write().await.next_scheduled_at = Some(next_daily_at.min(next_backup_at));

            let until_daily = next_daily_at.duration_since(&now).to_std().unwrap_or_default();

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return;
                    }
                }
                _ = time::sleep(until_daily) => {
                    self.scheduled_tick("daily").await;
                }
                _ = backup_timer.tick() => {
                    next_backup_at = self.clock.now().plus_std(backup);
                    self.scheduled_tick("backup").await;
                }
            }
        }
    }

    async fn scheduled_tick(&self, trigger: &'static str) {
        debug!(trigger, "Scheduled reconciliation tick");
        match self.trigger_now().await {
            Ok(_) => {}
            Err(SchedulerError::AlreadyRunning) => {
                warn!(trigger, "Skipping scheduled tick, previous tick still running");
            }
            // Already logged by trigger_now; the next timer retries.
            Err(_) => {}
        }
    }

    async fn tick(&self, now: Timestamp) -> Result<TickReport, SchedulerError> {
        let today = now.date_at_offset(self.config.utc_offset_minutes);
        let memberships = self.memberships.list_all().await?;
        let settings = self.settings.load().await?;

        let notify = self.notifier.is_configured();
        if !notify {
            info!("No notification channel configured, notices will be skipped");
        }

        let mut report = TickReport {
            date: Some(today),
            ..Default::default()
        };

        let mut terminations = Vec::new();
        let mut notices = Vec::new();

        for mut membership in memberships.into_iter().filter(Membership::is_active) {
            report.examined += 1;

            if !self.sync_status(&mut membership, today, &mut report).await {
                continue;
            }

            match self.classify(&membership, today) {
                Some(Bucket::Terminate) => terminations.push(membership.id),
                Some(bucket) => notices.push((bucket, membership)),
                None => {}
            }
        }

        let mut reclaimed = Vec::new();
        for id in terminations {
            if let Some(seat) = self
                .terminate(id, &settings, today, notify, &mut report)
                .await
            {
                reclaimed.push(seat);
            }
        }

        for (bucket, membership) in notices {
            self.send_notice(bucket, membership, &settings, today, notify, &mut report)
                .await;
        }

        if !reclaimed.is_empty() && notify {
            let digest = admin_digest(&settings.templates, &reclaimed, today);
            match self.notifier.send(&digest).await {
                Ok(()) => report.admin_digest_sent = true,
                Err(err) => {
                    report.failures += 1;
                    error!(error = %err, "Failed to send admin digest");
                }
            }
        }

        Ok(report)
    }

    /// Advance the tracked fee status and mirror it onto the seat.
    ///
    /// The write goes to a freshly loaded copy so a payment recorded since
    /// the tick's snapshot is kept. Returns `false` when the membership
    /// should be skipped this tick.
    async fn sync_status(
        &self,
        membership: &mut Membership,
        today: NaiveDate,
        report: &mut TickReport,
    ) -> bool {
        if membership.clone().sync_fee_status(today).is_none() {
            return true;
        }

        let Some(mut fresh) = self.reload(membership.id, report).await else {
            return false;
        };
        let Some(status) = fresh.sync_fee_status(today) else {
            *membership = fresh;
            return true;
        };

        if let Err(err) = self.memberships.update(&fresh).await {
            report.failures += 1;
            warn!(membership_id = %fresh.id, error = %err, "Failed to persist fee status");
            return false;
        }
        *membership = fresh;
        report.status_changes += 1;
        debug!(membership_id = %membership.id, status = %status, "Fee status advanced");

        if let Err(err) = self
            .seating
            .mirror_status(membership.seat_number, membership.id, status)
            .await
        {
            report.failures += 1;
            warn!(
                membership_id = %membership.id,
                seat = %membership.seat_number,
                error = %err,
                "Failed to mirror fee status onto seat"
            );
        }
        true
    }

    /// Load the current stored copy of an active membership.
    async fn reload(&self, id: MembershipId, report: &mut TickReport) -> Option<Membership> {
        match self.memberships.get(&id).await {
            Ok(Some(membership)) if membership.is_active() => Some(membership),
            Ok(_) => {
                debug!(membership_id = %id, "Membership left during tick");
                None
            }
            Err(err) => {
                report.failures += 1;
                warn!(membership_id = %id, error = %err, "Failed to reload membership");
                None
            }
        }
    }

    fn classify(&self, membership: &Membership, today: NaiveDate) -> Option<Bucket> {
        let days = membership.days_until_due(today);
        let due = membership.next_due_date;
        let grace = self.config.termination_grace_days;

        if days <= -grace && membership.fee_status == FeeStatus::Expired {
            return Some(Bucket::Terminate);
        }
        if days > -grace
            && days <= 0
            && membership.fee_status != FeeStatus::Paid
            && !membership.notices.due_notice_sent(due)
        {
            return Some(Bucket::DueToday);
        }
        if days > 0
            && days <= self.config.reminder_days
            && membership.fee_status != FeeStatus::Expired
            && !membership.notices.reminder_sent(due)
        {
            return Some(Bucket::Reminder);
        }
        None
    }

    async fn terminate(
        &self,
        id: MembershipId,
        settings: &HallSettings,
        today: NaiveDate,
        notify: bool,
        report: &mut TickReport,
    ) -> Option<ReclaimedSeat> {
        let mut membership = self.reload(id, report).await?;
        if self.classify(&membership, today) != Some(Bucket::Terminate) {
            debug!(membership_id = %id, "Membership settled during tick, not terminating");
            return None;
        }
        let seat = membership.seat_number;

        if let Err(err) = membership.expire() {
            report.failures += 1;
            warn!(membership_id = %id, error = %err, "Cannot expire membership");
            return None;
        }
        membership.leave();

        if let Err(err) = self.memberships.update(&membership).await {
            report.failures += 1;
            error!(membership_id = %id, error = %err, "Failed to persist termination");
            return None;
        }

        match self.seating.release(seat, id).await {
            Ok(true) => {}
            Ok(false) => debug!(membership_id = %id, seat = %seat, "Seat was already free"),
            Err(err) => {
                report.failures += 1;
                error!(membership_id = %id, seat = %seat, error = %err, "Failed to release seat");
            }
        }
        report.terminated.push((id, seat));
        info!(membership_id = %id, seat = %seat, slot = %membership.slot, "Membership terminated for non-payment");

        if notify {
            let amount = settings.price_table.price_for(&membership.slot).ok();
            let notice = member_notice(
                &settings.templates,
                NotificationCategory::Overdue,
                &membership,
                amount,
                today,
            );
            if let Err(err) = self.notifier.send(&notice).await {
                report.failures += 1;
                error!(membership_id = %id, error = %err, "Failed to send termination notice");
            }
        } else {
            report.notices_skipped += 1;
        }

        Some(ReclaimedSeat {
            seat,
            slot: membership.slot,
            name: membership.name,
        })
    }

    async fn send_notice(
        &self,
        bucket: Bucket,
        membership: Membership,
        settings: &HallSettings,
        today: NaiveDate,
        notify: bool,
        report: &mut TickReport,
    ) {
        if !notify {
            report.notices_skipped += 1;
            return;
        }

        let category = match bucket {
            Bucket::Reminder => NotificationCategory::Reminder,
            _ => NotificationCategory::Due,
        };
        let amount = settings.price_table.price_for(&membership.slot).ok();
        let notice = member_notice(&settings.templates, category, &membership, amount, today);

        if let Err(err) = self.notifier.send(&notice).await {
            report.failures += 1;
            error!(
                membership_id = %membership.id,
                category = %category,
                error = %err,
                "Failed to send notice"
            );
            return;
        }

        match bucket {
            Bucket::Reminder => report.reminders_sent += 1,
            _ => report.due_notices_sent += 1,
        }

        let Some(mut fresh) = self.reload(membership.id, report).await else {
            return;
        };
        if fresh.next_due_date != membership.next_due_date
            || self.classify(&fresh, today) != Some(bucket)
        {
            debug!(
                membership_id = %fresh.id,
                category = %category,
                "Membership changed while notice was sent, marker not recorded"
            );
            return;
        }

        match bucket {
            Bucket::Reminder => fresh.mark_reminder_sent(),
            _ => fresh.mark_due_notice_sent(),
        }

        if let Err(err) = self.memberships.update(&fresh).await {
            report.failures += 1;
            warn!(
                membership_id = %fresh.id,
                error = %err,
                "Notice sent but marker not persisted"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryMembershipStore, InMemorySeatStore, InMemorySettingsStore, ManualClock,
    };
    use crate::domain::billing::PriceTable;
    use crate::domain::foundation::{Amount, DomainError, SeatNumber, Slot};
    use crate::domain::notification::Notification;
    use crate::domain::seat::SeatStatus;
    use crate::ports::SeatStore;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex as StdMutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct RecordingNotifier {
        configured: bool,
        fail: bool,
        sent: StdMutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                fail: false,
                sent: StdMutex::new(Vec::new()),
            })
        }

        fn unconfigured() -> Arc<Self> {
            Arc::new(Self {
                configured: false,
                fail: false,
                sent: StdMutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                fail: true,
                sent: StdMutex::new(Vec::new()),
            })
        }

        fn categories(&self) -> Vec<NotificationCategory> {
            self.sent.lock().unwrap().iter().map(|n| n.category).collect()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::new(
                    crate::domain::foundation::ErrorCode::NotificationFailed,
                    "Simulated delivery failure",
                ));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    /// Records a payment for the member while their notice is in flight.
    struct PayingNotifier {
        memberships: InMemoryMembershipStore,
        payer: StdMutex<Option<MembershipId>>,
        paid_on: NaiveDate,
    }

    #[async_trait]
    impl Notifier for PayingNotifier {
        fn is_configured(&self) -> bool {
            true
        }

        async fn send(&self, _notification: &Notification) -> Result<(), DomainError> {
            let payer = self.payer.lock().unwrap().take();
            if let Some(id) = payer {
                let mut m = self.memberships.get(&id).await?.unwrap();
                m.record_payment(self.paid_on, Amount::new(900).unwrap())?;
                self.memberships.update(&m).await?;
            }
            Ok(())
        }
    }

    struct UnavailableStore;

    #[async_trait]
    impl MembershipStore for UnavailableStore {
        async fn list_all(&self) -> Result<Vec<Membership>, DomainError> {
            Err(DomainError::store("Simulated outage"))
        }

        async fn get(&self, _id: &MembershipId) -> Result<Option<Membership>, DomainError> {
            Err(DomainError::store("Simulated outage"))
        }

        async fn save(&self, _membership: &Membership) -> Result<(), DomainError> {
            Err(DomainError::store("Simulated outage"))
        }

        async fn update(&self, _membership: &Membership) -> Result<(), DomainError> {
            Err(DomainError::store("Simulated outage"))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn morning_of(day: NaiveDate) -> Timestamp {
        Timestamp::from_datetime(Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap()))
    }

    struct Hall {
        scheduler: Arc<ReconciliationScheduler>,
        memberships: InMemoryMembershipStore,
        seats: InMemorySeatStore,
        clock: Arc<ManualClock>,
        seating: Arc<SeatCoordinator>,
    }

    fn hall(notifier: Arc<dyn Notifier>, today: NaiveDate) -> Hall {
        let memberships = InMemoryMembershipStore::new();
        let seats = InMemorySeatStore::with_capacity(10);
        let settings = InMemorySettingsStore::new(HallSettings {
            price_table: PriceTable::from_entries([("Morning", 900)]).unwrap(),
            ..Default::default()
        });
        let clock = Arc::new(ManualClock::new(morning_of(today)));
        let seating = Arc::new(SeatCoordinator::new(Arc::new(seats.clone()), clock.clone()));
        let scheduler = Arc::new(ReconciliationScheduler::new(
            Arc::new(memberships.clone()),
            Arc::new(settings),
            notifier,
            seating.clone(),
            clock.clone(),
            SchedulerConfig::default(),
        ));
        Hall {
            scheduler,
            memberships,
            seats,
            clock,
            seating,
        }
    }

    /// Registers and pays so the membership falls due on `due`.
    async fn paid_member(hall: &Hall, seat: u32, due: NaiveDate) -> Membership {
        let anchor = due - chrono::Duration::days(30);
        let seat = SeatNumber::new(seat).unwrap();
        let slot = Slot::new("Morning").unwrap();
        let mut m = Membership::register(
            MembershipId::new(),
            "Asha",
            Some("asha@example.com".to_string()),
            seat,
            slot.clone(),
            anchor,
        )
        .unwrap();
        m.record_payment(anchor, Amount::new(900).unwrap()).unwrap();
        hall.seating.reserve(seat, m.id, &slot).await.unwrap();
        hall.seating.mirror_status(seat, m.id, FeeStatus::Paid).await.unwrap();
        hall.memberships.save(&m).await.unwrap();
        m
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tick behaviour
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn reminder_goes_out_three_days_before_due() {
        let notifier = RecordingNotifier::new();
        let hall = hall(notifier.clone(), date(2024, 1, 29));
        paid_member(&hall, 5, date(2024, 2, 1)).await;

        let report = hall.scheduler.trigger_now().await.unwrap();

        assert_eq!(report.reminders_sent, 1);
        assert_eq!(notifier.categories(), vec![NotificationCategory::Reminder]);
    }

    #[tokio::test]
    async fn repeated_tick_sends_no_duplicate_reminder() {
        let notifier = RecordingNotifier::new();
        let hall = hall(notifier.clone(), date(2024, 1, 29));
        paid_member(&hall, 5, date(2024, 2, 1)).await;

        hall.scheduler.trigger_now().await.unwrap();
        let second = hall.scheduler.trigger_now().await.unwrap();

        assert_eq!(second.reminders_sent, 0);
        assert_eq!(notifier.categories().len(), 1);
    }

    #[tokio::test]
    async fn missed_reminder_day_is_caught_up_next_day() {
        let notifier = RecordingNotifier::new();
        let hall = hall(notifier.clone(), date(2024, 1, 30));
        paid_member(&hall, 5, date(2024, 2, 1)).await;

        let report = hall.scheduler.trigger_now().await.unwrap();
        assert_eq!(report.reminders_sent, 1);
    }

    #[tokio::test]
    async fn due_day_syncs_status_and_sends_due_notice() {
        let notifier = RecordingNotifier::new();
        let hall = hall(notifier.clone(), date(2024, 2, 1));
        let m = paid_member(&hall, 5, date(2024, 2, 1)).await;

        let report = hall.scheduler.trigger_now().await.unwrap();

        assert_eq!(report.status_changes, 1);
        assert_eq!(report.due_notices_sent, 1);
        let stored = hall.memberships.get(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_status, FeeStatus::Due);
        let seat = hall.seats.get(m.seat_number).await.unwrap().unwrap();
        assert_eq!(seat.status_for(&m.slot), SeatStatus::Due);
    }

    #[tokio::test]
    async fn termination_releases_seat_exactly_once() {
        let notifier = RecordingNotifier::new();
        let hall = hall(notifier.clone(), date(2024, 2, 2));
        let m = paid_member(&hall, 5, date(2024, 2, 1)).await;

        // Day after due: expired, no termination yet.
        let first = hall.scheduler.trigger_now().await.unwrap();
        assert!(first.terminated.is_empty());

        hall.clock.set(morning_of(date(2024, 2, 4)));
        let report = hall.scheduler.trigger_now().await.unwrap();
        let again = hall.scheduler.trigger_now().await.unwrap();

        assert_eq!(report.terminated, vec![(m.id, m.seat_number)]);
        assert!(report.admin_digest_sent);
        assert!(again.terminated.is_empty());

        let stored = hall.memberships.get(&m.id).await.unwrap().unwrap();
        assert!(!stored.is_active());
        assert_eq!(stored.fee_status, FeeStatus::Expired);
        let seat = hall.seats.get(m.seat_number).await.unwrap().unwrap();
        assert_eq!(seat.status_for(&m.slot), SeatStatus::Available);

        let overdue = notifier
            .categories()
            .into_iter()
            .filter(|c| *c == NotificationCategory::Overdue)
            .count();
        assert_eq!(overdue, 1);
    }

    #[tokio::test]
    async fn unconfigured_notifier_still_reclaims_seats() {
        let notifier = RecordingNotifier::unconfigured();
        let hall = hall(notifier.clone(), date(2024, 2, 4));
        let m = paid_member(&hall, 5, date(2024, 2, 1)).await;

        let report = hall.scheduler.trigger_now().await.unwrap();

        assert_eq!(report.terminated.len(), 1);
        assert!(report.notices_skipped >= 1);
        assert!(!report.admin_digest_sent);
        assert!(notifier.categories().is_empty());
        let seat = hall.seats.get(m.seat_number).await.unwrap().unwrap();
        assert!(seat.is_vacant());
    }

    #[tokio::test]
    async fn failed_send_is_retried_next_tick() {
        let notifier = RecordingNotifier::failing();
        let hall = hall(notifier.clone(), date(2024, 1, 29));
        let m = paid_member(&hall, 5, date(2024, 2, 1)).await;

        let report = hall.scheduler.trigger_now().await.unwrap();

        assert_eq!(report.reminders_sent, 0);
        assert_eq!(report.failures, 1);
        let stored = hall.memberships.get(&m.id).await.unwrap().unwrap();
        assert!(!stored.notices.reminder_sent(m.next_due_date));
    }

    #[tokio::test]
    async fn payment_during_reminder_send_is_kept() {
        let hall = hall(RecordingNotifier::new(), date(2024, 1, 29));
        let notifier = Arc::new(PayingNotifier {
            memberships: hall.memberships.clone(),
            payer: StdMutex::new(None),
            paid_on: date(2024, 2, 1),
        });
        let scheduler = ReconciliationScheduler::new(
            Arc::new(hall.memberships.clone()),
            Arc::new(InMemorySettingsStore::default()),
            notifier.clone(),
            hall.seating.clone(),
            hall.clock.clone(),
            SchedulerConfig::default(),
        );
        let m = paid_member(&hall, 5, date(2024, 2, 1)).await;
        *notifier.payer.lock().unwrap() = Some(m.id);

        let report = scheduler.trigger_now().await.unwrap();

        assert_eq!(report.reminders_sent, 1);
        let stored = hall.memberships.get(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.payments.len(), 2);
        assert_eq!(stored.last_payment_date, Some(date(2024, 2, 1)));
        assert_eq!(stored.next_due_date, date(2024, 3, 2));
        assert_eq!(stored.fee_status, FeeStatus::Paid);
        assert_eq!(stored.notices.reminder_sent_for, None);
    }

    #[tokio::test]
    async fn payment_before_termination_cancels_it() {
        let notifier = RecordingNotifier::new();
        let hall = hall(notifier.clone(), date(2024, 2, 4));
        let m = paid_member(&hall, 5, date(2024, 2, 1)).await;

        let snapshot = hall.memberships.get(&m.id).await.unwrap().unwrap();
        let mut expired = snapshot.clone();
        expired.expire().unwrap();
        hall.memberships.update(&expired).await.unwrap();

        let mut paid = expired.clone();
        paid.record_payment(date(2024, 2, 4), Amount::new(900).unwrap()).unwrap();
        hall.memberships.update(&paid).await.unwrap();

        let settings = HallSettings::default();
        let mut report = TickReport::default();
        let reclaimed = hall
            .scheduler
            .terminate(expired.id, &settings, date(2024, 2, 4), true, &mut report)
            .await;

        assert!(reclaimed.is_none());
        assert!(report.terminated.is_empty());
        let stored = hall.memberships.get(&m.id).await.unwrap().unwrap();
        assert!(stored.is_active());
        assert_eq!(stored.fee_status, FeeStatus::Paid);
        let seat = hall.seats.get(m.seat_number).await.unwrap().unwrap();
        assert!(seat.is_occupied_by(&m.id));
    }

    #[tokio::test]
    async fn store_outage_aborts_tick() {
        let clock = Arc::new(ManualClock::new(morning_of(date(2024, 1, 1))));
        let seats: Arc<dyn SeatStore> = Arc::new(InMemorySeatStore::with_capacity(1));
        let scheduler = ReconciliationScheduler::new(
            Arc::new(UnavailableStore),
            Arc::new(InMemorySettingsStore::default()),
            RecordingNotifier::new(),
            Arc::new(SeatCoordinator::new(seats, clock.clone())),
            clock,
            SchedulerConfig::default(),
        );

        let err = scheduler.trigger_now().await.unwrap_err();
        assert!(matches!(err, SchedulerError::Store(_)));

        let status = scheduler.status().await;
        assert!(status.last_tick_at.is_some());
        assert!(status.last_report.is_none());
        assert!(!status.active);
    }

    #[tokio::test]
    async fn trigger_while_active_is_rejected() {
        let hall = hall(RecordingNotifier::new(), date(2024, 1, 1));
        let _held = ActiveTick::acquire(&hall.scheduler.active).unwrap();

        let err = hall.scheduler.trigger_now().await.unwrap_err();
        assert!(matches!(err, SchedulerError::AlreadyRunning));
    }

    #[tokio::test]
    async fn active_flag_clears_after_tick() {
        let hall = hall(RecordingNotifier::new(), date(2024, 1, 1));
        hall.scheduler.trigger_now().await.unwrap();

        let status = hall.scheduler.status().await;
        assert!(!status.active);
        assert_eq!(status.last_report.and_then(|r| r.date), Some(date(2024, 1, 1)));
    }

    #[tokio::test]
    async fn left_memberships_are_ignored() {
        let notifier = RecordingNotifier::new();
        let hall = hall(notifier.clone(), date(2024, 1, 29));
        let mut m = paid_member(&hall, 5, date(2024, 2, 1)).await;
        m.leave();
        hall.memberships.update(&m).await.unwrap();

        let report = hall.scheduler.trigger_now().await.unwrap();
        assert_eq!(report.examined, 0);
        assert!(notifier.categories().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Timers
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn start_and_stop_toggle_running() {
        let hall = hall(RecordingNotifier::new(), date(2024, 1, 1));

        hall.scheduler.start().await.unwrap();
        let status = hall.scheduler.status().await;
        assert!(status.running);

        assert!(matches!(
            hall.scheduler.start().await,
            Err(SchedulerError::AlreadyStarted)
        ));

        hall.scheduler.stop().await;
        let status = hall.scheduler.status().await;
        assert!(!status.running);
        assert!(status.next_scheduled_at.is_none());
    }

    #[tokio::test]
    async fn stop_without_start_is_a_no_op() {
        let hall = hall(RecordingNotifier::new(), date(2024, 1, 1));
        hall.scheduler.stop().await;
        assert!(!hall.scheduler.status().await.running);
    }

    #[tokio::test(start_paused = true)]
    async fn backup_timer_runs_ticks() {
        let hall = hall(RecordingNotifier::new(), date(2024, 1, 1));
        let scheduler = Arc::new(ReconciliationScheduler::new(
            Arc::new(hall.memberships.clone()),
            Arc::new(InMemorySettingsStore::default()),
            RecordingNotifier::new(),
            hall.seating.clone(),
            hall.clock.clone(),
            SchedulerConfig::default().with_backup_interval(std::time::Duration::from_secs(60)),
        ));

        scheduler.start().await.unwrap();
        time::sleep(std::time::Duration::from_secs(61)).await;
        scheduler.stop().await;

        assert!(scheduler.status().await.last_tick_at.is_some());
    }
}
