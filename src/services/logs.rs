//! Activity logs — the append-only history of finished sessions.

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::worker::PendingLog;

#[derive(Debug, thiserror::Error)]
pub enum LogsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from `activity_logs`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub option_id: Uuid,
    pub scheduled_id: Option<Uuid>,
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    pub duration_minutes: i64,
}

/// List the user's logs, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_logs(pool: &PgPool, user_id: Uuid) -> Result<Vec<ActivityLog>, LogsError> {
    let rows = sqlx::query_as::<_, (Uuid, Uuid, Option<Uuid>, OffsetDateTime, OffsetDateTime, i64)>(
        "SELECT id, option_id, scheduled_id, started_at, ended_at, duration_minutes
         FROM activity_logs
         WHERE user_id = $1
         ORDER BY started_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, option_id, scheduled_id, started_at, ended_at, duration_minutes)| ActivityLog {
            id,
            option_id,
            scheduled_id,
            started_at,
            ended_at,
            duration_minutes,
        })
        .collect())
}

/// Insert one log row.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn insert_log(pool: &PgPool, log: &PendingLog) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO activity_logs (user_id, option_id, scheduled_id, started_at, ended_at, duration_minutes)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(log.user_id)
    .bind(log.option_id)
    .bind(log.scheduled_id)
    .bind(log.started_at)
    .bind(log.ended_at)
    .bind(log.duration_minutes)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a batch of log rows in one transaction.
///
/// # Errors
///
/// Returns a database error if any insert fails; the transaction rolls back
/// and the whole batch stays pending.
pub async fn insert_log_batch(pool: &PgPool, logs: &[PendingLog]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for log in logs {
        sqlx::query(
            "INSERT INTO activity_logs (user_id, option_id, scheduled_id, started_at, ended_at, duration_minutes)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(log.user_id)
        .bind(log.option_id)
        .bind(log.scheduled_id)
        .bind(log.started_at)
        .bind(log.ended_at)
        .bind(log.duration_minutes)
        .execute(tx.as_mut())
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
