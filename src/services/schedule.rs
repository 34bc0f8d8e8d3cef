//! Scheduled activities — calendar slots and the current-slot lookup.
//!
//! DESIGN
//! ======
//! Creation performs no overlap check; overlapping slots are legal and the
//! lookup resolves ties by `start_time` order (earliest wins — see
//! DESIGN.md). The current-slot derivation is cached per user and kept
//! fresh by the background refresh task, so interval entry/exit is observed
//! within the one-minute staleness bound even between client requests.

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::state::{AppState, ScheduleCacheEntry};
use crate::tracker::schedule::{ScheduledSlot, current_scheduled};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("scheduled activity not found: {0}")]
    NotFound(Uuid),
    #[error("end time must come after start time")]
    EmptyInterval,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a calendar slot for an option.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptyInterval`] when `end_time <= start_time`,
/// or a database error if the insert fails.
pub async fn create_slot(
    pool: &PgPool,
    user_id: Uuid,
    option_id: Uuid,
    start_time: OffsetDateTime,
    end_time: OffsetDateTime,
) -> Result<ScheduledSlot, ScheduleError> {
    if end_time <= start_time {
        return Err(ScheduleError::EmptyInterval);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO scheduled_activities (user_id, option_id, start_time, end_time)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(option_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(pool)
    .await?;

    Ok(ScheduledSlot { id, option_id, start_time, end_time })
}

/// List the user's slots ordered by start time.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_slots(pool: &PgPool, user_id: Uuid) -> Result<Vec<ScheduledSlot>, ScheduleError> {
    let rows = sqlx::query_as::<_, (Uuid, Uuid, OffsetDateTime, OffsetDateTime)>(
        "SELECT id, option_id, start_time, end_time
         FROM scheduled_activities
         WHERE user_id = $1
         ORDER BY start_time",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, option_id, start_time, end_time)| ScheduledSlot { id, option_id, start_time, end_time })
        .collect())
}

/// Delete a slot the user owns.
///
/// # Errors
///
/// Returns [`ScheduleError::NotFound`] when the row does not exist or
/// belongs to someone else.
pub async fn delete_slot(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ScheduleError> {
    let result = sqlx::query("DELETE FROM scheduled_activities WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ScheduleError::NotFound(id));
    }
    Ok(())
}

/// Derive the slot covering `now` straight from the database.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn derive_current(
    pool: &PgPool,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<Option<ScheduledSlot>, ScheduleError> {
    let slots = list_slots(pool, user_id).await?;
    Ok(current_scheduled(&slots, now).copied())
}

/// Current scheduled activity for a user, via the cache.
///
/// A cache miss derives from the database and registers the user with the
/// refresh task; a hit marks the entry as recently read so it stays alive.
///
/// # Errors
///
/// Returns a database error if a cache-miss derivation fails.
pub async fn current_for_user(state: &AppState, user_id: Uuid) -> Result<Option<ScheduledSlot>, ScheduleError> {
    {
        let mut cache = state.schedule_cache.write().await;
        if let Some(entry) = cache.get_mut(&user_id) {
            entry.last_read = std::time::Instant::now();
            return Ok(entry.current);
        }
    }

    let current = derive_current(&state.pool, user_id, OffsetDateTime::now_utc()).await?;

    let mut cache = state.schedule_cache.write().await;
    cache.insert(user_id, ScheduleCacheEntry::new(current));
    Ok(current)
}

/// Drop a user's cache entry after a mutation so the next read re-derives.
pub async fn invalidate_cache(state: &AppState, user_id: Uuid) {
    let mut cache = state.schedule_cache.write().await;
    cache.remove(&user_id);
}
