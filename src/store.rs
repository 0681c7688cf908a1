use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::model::{Car, CarFields, NewCar};

// Non-id columns are nullable; NULL is read back as an empty string.
const SELECT_CARS: &str = r#"
    SELECT carsid,
        COALESCE(make, '') AS make,
        COALESCE(model, '') AS model,
        COALESCE(licenceplate, '') AS licenceplate,
        COALESCE(ownername, '') AS ownername,
        COALESCE("date", '') AS "date",
        COALESCE(status, '') AS status
    FROM cars
"#;

/// Persistence seam for car records. Every user-supplied value reaches the
/// database as a bound parameter.
#[async_trait]
pub trait CarStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Car>, sqlx::Error>;

    /// Matches come back as a list; an unknown id yields an empty one.
    async fn find_by_id(&self, id: &str) -> Result<Vec<Car>, sqlx::Error>;

    async fn create(&self, car: &NewCar) -> Result<(), sqlx::Error>;

    /// Returns the number of rows overwritten.
    async fn update(&self, id: &str, fields: &CarFields) -> Result<u64, sqlx::Error>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: &str) -> Result<u64, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct PgCarStore {
    pool: PgPool,
}

impl PgCarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    async fn list(&self) -> Result<Vec<Car>, sqlx::Error> {
        sqlx::query_as::<_, Car>(SELECT_CARS)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!("{SELECT_CARS} WHERE carsid = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
    }

    async fn create(&self, car: &NewCar) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO cars
            (carsid, make, model, licenceplate, ownername, "date", status)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&car.id)
        .bind(&car.fields.make)
        .bind(&car.fields.model)
        .bind(&car.fields.licence_plate)
        .bind(&car.fields.owner_name)
        .bind(&car.fields.date)
        .bind(&car.fields.status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, id: &str, fields: &CarFields) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE cars
            SET make = $1, model = $2, licenceplate = $3, ownername = $4, "date" = $5, status = $6
            WHERE carsid = $7
            "#,
        )
        .bind(&fields.make)
        .bind(&fields.model)
        .bind(&fields.licence_plate)
        .bind(&fields.owner_name)
        .bind(&fields.date)
        .bind(&fields.status)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cars WHERE carsid = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
