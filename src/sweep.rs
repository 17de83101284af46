//! Due-date sweep.
//!
//! Runs once at startup and then on a fixed interval for the lifetime of the
//! process. Each pass reads the whole store and queues one reminder per loan
//! whose notification date is exactly today. The schedule is not persisted:
//! a restart resets the anchor, and a due day that falls inside a downtime
//! window is never sent.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::dates;
use crate::mailer::{self, Notifier};
use crate::store::RecordStore;

/// One notification pass against the given day. A store failure is logged
/// and the pass skipped; it does not stop the schedule.
pub async fn run_sweep(store: &RecordStore, config: &Config, notifier: &Notifier, today: NaiveDate) {
    let records = match store.load().await {
        Ok(records) => records,
        Err(e) => {
            error!("Sweep skipped, store unreadable: {}", e);
            return;
        }
    };

    let mut queued = 0usize;
    for record in &records {
        debug!(
            "Checking \"{}\": loaned {}, notification date {}",
            record.name,
            record.loan_date,
            dates::add_days(record.loan_date, config.policy.loan_days)
        );
        if dates::due_for_reminder(record, today, config.policy.loan_days) {
            notifier.enqueue(mailer::reminder_email(record, config.policy.loan_days));
            queued += 1;
        }
    }

    info!("Sweep done: {} of {} loans due for a reminder", queued, records.len());
}

/// Spawn the periodic sweep task. The first tick fires immediately.
pub fn spawn(store: Arc<RecordStore>, config: Arc<Config>, notifier: Notifier) {
    tokio::spawn(async move {
        let period = Duration::from_secs(config.policy.sweep_interval_hours * 60 * 60);
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            run_sweep(&store, &config, &notifier, Local::now().date_naive()).await;
        }
    });
}
