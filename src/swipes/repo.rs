use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One judgment in the append-only ledger. Rows are only ever inserted
/// here or deleted wholesale when their user is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interaction {
    pub id: i64,
    pub user_id: Uuid,
    pub car_id: i64,
    pub swiped_right: bool,
    pub created_at: OffsetDateTime,
}

/// Append one interaction row. A referential violation (e.g. a car id that
/// does not exist) aborts the transaction and is handed back to the caller
/// once; nothing is retried.
pub async fn record(
    db: &PgPool,
    user_id: Uuid,
    car_id: i64,
    swiped_right: bool,
) -> Result<Interaction, sqlx::Error> {
    let mut tx = db.begin().await?;
    let interaction = sqlx::query_as::<_, Interaction>(
        r#"
        INSERT INTO user_interactions (user_id, car_id, swiped_right)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, car_id, swiped_right, created_at
        "#,
    )
    .bind(user_id)
    .bind(car_id)
    .bind(swiped_right)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(interaction)
}
