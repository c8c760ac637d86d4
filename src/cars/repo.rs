use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Car record in the catalog. `like_count` is a denormalized popularity
/// counter adjusted directly by the toggle endpoint; it has no floor and
/// is not derived from the swipe ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: i64,
    pub image: String,
    pub car_name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub body_type: String,
    pub horsepower: i32,
    pub monthly_payment: f64,
    pub mileage: i32,
    pub like_count: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const CAR_COLUMNS: &str = "id, image, car_name, make, model, year, body_type, horsepower, \
                           monthly_payment, mileage, like_count, created_at, updated_at";

pub async fn find(db: &PgPool, id: i64) -> anyhow::Result<Option<Car>> {
    let car = sqlx::query_as::<_, Car>(&format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(car)
}

/// The candidate set: every car this user has not judged yet, in catalog
/// insertion order. One anti-join, not a per-car existence probe.
pub async fn candidates_for(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Car>> {
    let cars = sqlx::query_as::<_, Car>(&format!(
        r#"
        SELECT {CAR_COLUMNS}
        FROM cars c
        WHERE NOT EXISTS (
            SELECT 1 FROM user_interactions ui
            WHERE ui.user_id = $1 AND ui.car_id = c.id
        )
        ORDER BY c.id
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(cars)
}

/// Cars the user swiped right on, oldest swipe first. The inner join makes
/// a car deleted after being liked drop out silently instead of erroring.
pub async fn liked_by(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Car>> {
    let cars = sqlx::query_as::<_, Car>(&format!(
        r#"
        SELECT {CAR_COLUMNS}
        FROM user_interactions ui
        JOIN cars c ON c.id = ui.car_id
        WHERE ui.user_id = $1 AND ui.swiped_right
        ORDER BY ui.id
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(cars)
}

/// Atomically move the popularity counter by +1/-1 and return the new
/// value, or None when the car does not exist. The counter may go
/// negative; the source behavior has no floor.
pub async fn adjust_popularity(db: &PgPool, id: i64, liked: bool) -> anyhow::Result<Option<i32>> {
    let delta: i32 = if liked { 1 } else { -1 };
    let new_count = sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE cars
        SET like_count = like_count + $2, updated_at = now()
        WHERE id = $1
        RETURNING like_count
        "#,
    )
    .bind(id)
    .bind(delta)
    .fetch_optional(db)
    .await?;
    Ok(new_count)
}

/// Demo catalog for first boot: the nine classics, with a randomized
/// starting popularity per car. No-op when the table already has rows.
pub async fn seed_catalog(db: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
        .fetch_one(db)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let seed: [(&str, &str, &str, &str, i32, &str, i32, f64, i32); 9] = [
        ("astonMartinSILagonda1", "Aston Martin Lagonda Series 1", "Aston Martin", "Lagonda", 1974, "4-door saloon", 280, 4611.96, 18324),
        ("astonMartinSIIILagonda3", "Aston Martin Lagonda Series 3", "Aston Martin", "Lagonda", 1986, "4-door saloon", 230, 7766.58, 132084),
        ("astonMartinSIVLagonda4", "Aston Martin Lagonda Series 4", "Aston Martin", "Lagonda", 1987, "4-door saloon", 240, 3633.98, 123117),
        ("ferrariTestarossa1", "Ferrari Testarossa", "Ferrari", "Testarossa", 1984, "2-door berlinetta", 385, 4185.91, 146545),
        ("ferrariF512TR3", "Ferrari F512 TR", "Ferrari", "512 TR", 1991, "2-door berlinetta", 422, 3245.32, 198978),
        ("ferrari308GTRainbow4", "Ferrari 308 GT Bertone Rainbow", "Ferrari", "308 GT", 1976, "2-door coupe", 255, 5585.91, 89017),
        ("countachLP400Lamborghini1", "Lamborghini Countach LP400", "Lamborghini", "LP400", 1974, "2-door coupe", 375, 8042.47, 167228),
        ("countachLP5000LamborghiniQuattrovalvole3", "Lamborghini Countach Quattrovalvole", "Lamborghini", "LP5000", 1985, "2-door coupe", 455, 8930.27, 103074),
        ("countach25thAnniversaryLamborghini4", "Lamborghini Countach 25th Anniversary", "Lamborghini", "25th Anniversary", 1988, "2-door coupe", 414, 6409.78, 140320),
    ];

    let mut rng = rand::thread_rng();
    let mut tx = db.begin().await?;
    for (image, car_name, make, model, year, body_type, horsepower, monthly_payment, mileage) in
        seed
    {
        sqlx::query(
            r#"
            INSERT INTO cars (image, car_name, make, model, year, body_type,
                              horsepower, monthly_payment, mileage, like_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(image)
        .bind(car_name)
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(body_type)
        .bind(horsepower)
        .bind(monthly_payment)
        .bind(mileage)
        .bind(rng.gen_range(1..=100))
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(cars = seed.len(), "seeded empty catalog");
    Ok(())
}
