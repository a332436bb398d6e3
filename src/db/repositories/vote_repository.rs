use crate::db::connection::DbPool;
use crate::db::models::CategoryCount;
use sqlx::Error;

/// Counts vote rows per category. Categories without votes are absent.
pub async fn count_votes_by_category(pool: &DbPool) -> Result<Vec<CategoryCount>, Error> {
    let rows = sqlx::query_as::<_, CategoryCount>(
        "SELECT pet, COUNT(*) AS count FROM votes GROUP BY pet ORDER BY pet",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
