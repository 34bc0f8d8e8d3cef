//! Activity options — the user's palette of trackable activities.
//!
//! Options are immutable after creation except deletion, so the surface is
//! create, list, delete. All queries are scoped to the owning user.

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("activity option not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row from `activity_options`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActivityOption {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

/// Create an option.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_option(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    color: &str,
) -> Result<ActivityOption, OptionsError> {
    let (id,): (Uuid,) =
        sqlx::query_as("INSERT INTO activity_options (user_id, name, color) VALUES ($1, $2, $3) RETURNING id")
            .bind(user_id)
            .bind(name)
            .bind(color)
            .fetch_one(pool)
            .await?;

    Ok(ActivityOption { id, name: name.to_owned(), color: color.to_owned() })
}

/// List the user's options in creation order.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_options(pool: &PgPool, user_id: Uuid) -> Result<Vec<ActivityOption>, OptionsError> {
    let rows = sqlx::query_as::<_, (Uuid, String, String)>(
        "SELECT id, name, color FROM activity_options WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, color)| ActivityOption { id, name, color })
        .collect())
}

/// Delete an option the user owns.
///
/// # Errors
///
/// Returns [`OptionsError::NotFound`] when the row does not exist or belongs
/// to someone else.
pub async fn delete_option(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), OptionsError> {
    let result = sqlx::query("DELETE FROM activity_options WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(OptionsError::NotFound(id));
    }
    Ok(())
}
