//! study-hall daemon
//!
//! Long-running process that:
//! - Provisions seats and in-memory stores
//! - Wires the e-mail and chat notifiers from configuration
//! - Runs the daily reconciliation scheduler until Ctrl-C
//!
//! This binary is a wiring harness. The stores are the in-memory adapters and
//! start empty, so state lives only as long as the process; a persistent
//! adapter behind the same ports replaces them in a deployment. The
//! membership handlers are library API with no front end here.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use study_hall::adapters::{
    ChatWebhookNotifier, FanoutNotifier, InMemoryMembershipStore, InMemorySeatStore,
    InMemorySettingsStore, ResendEmailNotifier, SystemClock,
};
use study_hall::application::{ReconciliationScheduler, SeatCoordinator};
use study_hall::config::{AppConfig, LogFormat, LoggingConfig};
use study_hall::ports::{Clock, HallSettings};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    tracing::info!(
        capacity = config.seats.capacity,
        daily_at = %config.scheduler.daily_at,
        utc_offset_minutes = config.scheduler.utc_offset_minutes,
        "Starting study-hall"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let seats = Arc::new(InMemorySeatStore::with_capacity(config.seats.capacity));
    let memberships = Arc::new(InMemoryMembershipStore::new());
    let settings = Arc::new(InMemorySettingsStore::new(HallSettings {
        price_table: config.pricing.price_table()?,
        templates: config.templates.template_set(),
    }));

    let notifier = Arc::new(build_notifier(&config)?);
    if notifier.channel_names().is_empty() {
        tracing::warn!("No notification channel configured; notices will be skipped");
    } else {
        tracing::info!(channels = ?notifier.channel_names(), "Notification channels ready");
    }

    let seating = Arc::new(SeatCoordinator::with_config(
        seats,
        clock.clone(),
        config.seats.coordinator_config(),
    ));
    let scheduler = Arc::new(ReconciliationScheduler::new(
        memberships,
        settings,
        notifier,
        seating,
        clock,
        config.scheduler.to_scheduler_config()?,
    ));

    scheduler.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    scheduler.stop().await;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn build_notifier(config: &AppConfig) -> Result<FanoutNotifier, BoxError> {
    let mut notifier = FanoutNotifier::new();
    if let Some(email) = config.email.resend_config() {
        notifier = notifier.with_channel("email", Arc::new(ResendEmailNotifier::new(email)?));
    }
    if let Some(chat) = config.chat.webhook_config() {
        notifier = notifier.with_channel("chat", Arc::new(ChatWebhookNotifier::new(chat)?));
    }
    Ok(notifier)
}
