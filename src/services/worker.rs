//! Background workers — durable log flushing and schedule re-derivation.
//!
//! DESIGN
//! ======
//! Finished sessions go through a bounded queue and are written in batches
//! with bounded retries, so stopping a session never waits on Postgres and
//! a transient outage delays the write instead of losing it. A second task
//! re-derives each cached user's "current scheduled activity" on a timer,
//! keeping the derivation within its one-minute staleness bound between
//! client requests.
//!
//! ERROR HANDLING
//! ==============
//! A batch that still fails after all retries is dropped with an error log;
//! the in-memory session was already cleared when the log was queued, so
//! this is the one place the at-most-once durability gap survives.

#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;

use std::time::{Duration, Instant};

use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::services::{logs, schedule};
use crate::state::AppState;
use crate::tracker::LogDraft;

const DEFAULT_LOG_FLUSH_QUEUE_CAPACITY: usize = 1024;
const DEFAULT_LOG_FLUSH_BATCH_SIZE: usize = 64;
const DEFAULT_LOG_FLUSH_MS: u64 = 500;
const DEFAULT_LOG_FLUSH_RETRIES: usize = 3;
const DEFAULT_LOG_FLUSH_RETRY_BASE_MS: u64 = 200;

const DEFAULT_SCHEDULE_REFRESH_SECS: u64 = 30;
const DEFAULT_SCHEDULE_CACHE_IDLE_SECS: u64 = 900;

/// A finished session waiting to be written to `activity_logs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLog {
    pub user_id: Uuid,
    pub option_id: Uuid,
    pub scheduled_id: Option<Uuid>,
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    pub duration_minutes: i64,
}

impl PendingLog {
    #[must_use]
    pub fn from_draft(user_id: Uuid, draft: &LogDraft) -> Self {
        Self {
            user_id,
            option_id: draft.option_id,
            scheduled_id: draft.scheduled_id,
            started_at: draft.started_at,
            ended_at: draft.ended_at,
            duration_minutes: draft.duration_minutes,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Tuning knobs for the log flush worker, loaded from environment variables.
#[derive(Clone, Copy)]
pub(crate) struct LogFlushConfig {
    pub(crate) queue_capacity: usize,
    pub(crate) batch_size: usize,
    pub(crate) flush_ms: u64,
    pub(crate) retries: usize,
    pub(crate) retry_base_ms: u64,
}

/// At least one write attempt per batch; zero retries would drain a batch
/// without ever reaching the database or the failure log.
pub(crate) fn clamped_retries(requested: usize) -> usize {
    requested.max(1)
}

impl LogFlushConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            queue_capacity: env_parse("LOG_FLUSH_QUEUE_CAPACITY", DEFAULT_LOG_FLUSH_QUEUE_CAPACITY),
            batch_size: env_parse("LOG_FLUSH_BATCH_SIZE", DEFAULT_LOG_FLUSH_BATCH_SIZE),
            flush_ms: env_parse("LOG_FLUSH_MS", DEFAULT_LOG_FLUSH_MS),
            retries: clamped_retries(env_parse("LOG_FLUSH_RETRIES", DEFAULT_LOG_FLUSH_RETRIES)),
            retry_base_ms: env_parse("LOG_FLUSH_RETRY_BASE_MS", DEFAULT_LOG_FLUSH_RETRY_BASE_MS),
        }
    }
}

/// Spawn the bounded log flush worker and return its queue sender.
#[must_use]
pub fn spawn_log_flush_worker(pool: PgPool) -> mpsc::Sender<PendingLog> {
    let config = LogFlushConfig::from_env();
    let (tx, mut rx) = mpsc::channel::<PendingLog>(config.queue_capacity);

    info!(
        queue_capacity = config.queue_capacity,
        batch_size = config.batch_size,
        flush_ms = config.flush_ms,
        retries = config.retries,
        "log flush worker configured"
    );

    tokio::spawn(async move {
        let mut batch: Vec<PendingLog> = Vec::with_capacity(config.batch_size);
        let mut ticker = tokio::time::interval(Duration::from_millis(config.flush_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe_log = rx.recv() => {
                    if let Some(log) = maybe_log {
                        batch.push(log);
                        if batch.len() >= config.batch_size {
                            flush_batch_with_retry(&pool, &mut batch, config).await;
                        }
                    } else {
                        flush_batch_with_retry(&pool, &mut batch, config).await;
                        break;
                    }
                }
                _ = ticker.tick() => {
                    flush_batch_with_retry(&pool, &mut batch, config).await;
                }
            }
        }
    });

    tx
}

/// Hand a finished session to the flush worker. Falls back to a direct
/// write when the queue is full or missing, so a log is only lost if the
/// database itself refuses it.
pub async fn submit_log(state: &AppState, log: PendingLog) {
    let log = if let Some(tx) = &state.log_tx {
        match tx.try_send(log) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Full(rejected)) => {
                warn!(user_id = %rejected.user_id, "log flush queue full; writing inline");
                rejected
            }
            Err(mpsc::error::TrySendError::Closed(rejected)) => {
                warn!(user_id = %rejected.user_id, "log flush queue closed; writing inline");
                rejected
            }
        }
    } else {
        log
    };

    if let Err(e) = logs::insert_log(&state.pool, &log).await {
        error!(error = %e, user_id = %log.user_id, "activity log write failed; log dropped");
    }
}

async fn flush_batch_with_retry(pool: &PgPool, batch: &mut Vec<PendingLog>, config: LogFlushConfig) {
    if batch.is_empty() {
        return;
    }

    let drained = std::mem::take(batch);
    for attempt in 1..=config.retries {
        match logs::insert_log_batch(pool, &drained).await {
            Ok(()) => return,
            Err(e) if attempt < config.retries => {
                warn!(
                    error = %e,
                    attempt,
                    total = config.retries,
                    count = drained.len(),
                    "log batch write failed; retrying"
                );
                tokio::time::sleep(Duration::from_millis((attempt as u64) * config.retry_base_ms)).await;
            }
            Err(e) => {
                error!(error = %e, count = drained.len(), "log batch write failed after retries; dropping logs");
                return;
            }
        }
    }
}

// =============================================================================
// SCHEDULE REFRESH
// =============================================================================

pub(crate) fn cache_entry_is_stale(last_read: Instant, now: Instant, max_idle: Duration) -> bool {
    now.saturating_duration_since(last_read) > max_idle
}

/// Spawn the task that re-derives every cached user's current scheduled
/// activity. Returns a handle for shutdown.
pub fn spawn_schedule_refresh_task(state: AppState) -> JoinHandle<()> {
    let refresh_secs = env_parse("SCHEDULE_REFRESH_SECS", DEFAULT_SCHEDULE_REFRESH_SECS);
    let idle_secs = env_parse("SCHEDULE_CACHE_IDLE_SECS", DEFAULT_SCHEDULE_CACHE_IDLE_SECS);
    info!(refresh_secs, idle_secs, "schedule refresh task configured");

    tokio::spawn(async move {
        let max_idle = Duration::from_secs(idle_secs);
        loop {
            tokio::time::sleep(Duration::from_secs(refresh_secs)).await;
            refresh_schedule_cache(&state, max_idle).await;
        }
    })
}

async fn refresh_schedule_cache(state: &AppState, max_idle: Duration) {
    // PHASE: SNAPSHOT + EVICT UNDER LOCK
    // WHY: derivation hits the database per user, so collect ids first and
    // do the I/O lock-free.
    let user_ids = {
        let mut cache = state.schedule_cache.write().await;
        let now = Instant::now();
        cache.retain(|_, entry| !cache_entry_is_stale(entry.last_read, now, max_idle));
        cache.keys().copied().collect::<Vec<_>>()
    };

    for user_id in user_ids {
        let now = OffsetDateTime::now_utc();
        match schedule::derive_current(&state.pool, user_id, now).await {
            Ok(current) => {
                let mut cache = state.schedule_cache.write().await;
                let Some(entry) = cache.get_mut(&user_id) else {
                    continue;
                };
                let previous = entry.current.map(|slot| slot.id);
                if previous != current.map(|slot| slot.id) {
                    info!(%user_id, entered = current.is_some(), "current scheduled activity changed");
                }
                entry.current = current;
                entry.refreshed_at = Instant::now();
            }
            Err(e) => {
                // Keep the stale entry; next tick retries.
                warn!(error = %e, %user_id, "schedule refresh failed");
            }
        }
    }
}

#[cfg(test)]
pub(crate) async fn refresh_schedule_cache_for_tests(state: &AppState, max_idle: Duration) {
    refresh_schedule_cache(state, max_idle).await;
}
