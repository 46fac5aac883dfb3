//! PostgreSQL implementation of CatalogReader.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::rows::column;
use crate::domain::catalog::{Schedule, Theme};
use crate::domain::foundation::{DomainError, ScheduleId, ThemeId};
use crate::ports::CatalogReader;

/// PostgreSQL implementation of CatalogReader.
#[derive(Clone)]
pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn find_schedule(&self, id: ScheduleId) -> Result<Option<Schedule>, DomainError> {
        let row = sqlx::query("SELECT id, theme_id, date, time FROM schedule WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch schedule", e))?;

        row.map(row_to_schedule).transpose()
    }

    async fn list_themes(&self) -> Result<Vec<Theme>, DomainError> {
        let rows = sqlx::query("SELECT id, name, description, price FROM theme ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list themes", e))?;

        rows.into_iter().map(row_to_theme).collect()
    }
}

fn row_to_schedule(row: PgRow) -> Result<Schedule, DomainError> {
    let id: i64 = column(&row, "id")?;
    let theme_id: i64 = column(&row, "theme_id")?;
    let date: NaiveDate = column(&row, "date")?;
    let time: NaiveTime = column(&row, "time")?;
    Ok(Schedule::new(
        ScheduleId::new(id),
        ThemeId::new(theme_id),
        date,
        time,
    ))
}

fn row_to_theme(row: PgRow) -> Result<Theme, DomainError> {
    let id: i64 = column(&row, "id")?;
    let name: String = column(&row, "name")?;
    let description: String = column(&row, "description")?;
    let price: i32 = column(&row, "price")?;
    Ok(Theme::new(
        ThemeId::new(id),
        name,
        description,
        price.max(0) as u32,
    ))
}
