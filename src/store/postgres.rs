use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::errors::AppError;
use crate::models::complaint::{Complaint, ComplaintStatus, NewComplaint};
use super::ComplaintStore;

const COLUMNS: &str = "id, user_name, room_number, section, product_type, \
                       product_serial_number, problem_description, user_signature, \
                       representative_name, solution, representative_signature, \
                       status, created_at";

/// Postgres-backed store over the `complaints` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ComplaintRow {
    id: i64,
    user_name: String,
    room_number: String,
    section: String,
    product_type: String,
    product_serial_number: String,
    problem_description: String,
    user_signature: String,
    representative_name: String,
    solution: String,
    representative_signature: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ComplaintRow> for Complaint {
    type Error = AppError;

    fn try_from(row: ComplaintRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ComplaintStatus>()
            .map_err(|e| AppError::Db(sqlx::Error::Decode(e.into())))?;
        Ok(Complaint {
            id: row.id,
            user_name: row.user_name,
            room_number: row.room_number,
            section: row.section,
            product_type: row.product_type,
            product_serial_number: row.product_serial_number,
            problem_description: row.problem_description,
            user_signature: row.user_signature,
            representative_name: row.representative_name,
            solution: row.solution,
            representative_signature: row.representative_signature,
            status,
            created_at: row.created_at,
        })
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        log::info!("Database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ComplaintStore for PgStore {
    async fn list(&self) -> Result<Vec<Complaint>, AppError> {
        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COLUMNS} FROM complaints ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Complaint::try_from).collect()
    }

    async fn find(&self, id: i64) -> Result<Option<Complaint>, AppError> {
        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COLUMNS} FROM complaints WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Complaint::try_from).transpose()
    }

    async fn append(&self, new: NewComplaint) -> Result<Complaint, AppError> {
        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            "INSERT INTO complaints (user_name, room_number, section, product_type, \
                                     product_serial_number, problem_description, user_signature, \
                                     representative_name, solution, representative_signature, \
                                     status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.user_name)
        .bind(&new.room_number)
        .bind(&new.section)
        .bind(&new.product_type)
        .bind(&new.product_serial_number)
        .bind(&new.problem_description)
        .bind(&new.user_signature)
        .bind(&new.representative_name)
        .bind(&new.solution)
        .bind(&new.representative_signature)
        .bind(ComplaintStatus::Open.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Complaint::try_from(row)
    }

    async fn update_status(
        &self,
        id: i64,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, AppError> {
        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            "UPDATE complaints SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Complaint::try_from).transpose()
    }
}
