//! PostgreSQL implementation of WaitingRepository.
//!
//! Queue order is the `BIGSERIAL` id. Positions are counted on read over
//! `idx_reservation_waiting_queue`, bounded by the calculator's window.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::rows::{column, member_id};
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, ScheduleId, WaitingId};
use crate::domain::reservation::{PositionCalculator, ReservationWaiting};
use crate::ports::WaitingRepository;

/// PostgreSQL implementation of WaitingRepository.
const MAX_SAVE_ATTEMPTS: usize = 2;

/// Raised when a member's entry keeps disappearing between insert and read-back.
fn vanished_entry(member_id: &MemberId, schedule_id: ScheduleId) -> DomainError {
    DomainError::new(
        ErrorCode::ConcurrencyConflict,
        format!(
            "Waiting entry of {} on schedule {} changed concurrently",
            member_id, schedule_id
        ),
    )
    .with_detail("schedule_id", schedule_id.to_string())
}

#[derive(Clone)]
pub struct PostgresWaitingRepository {
    pool: PgPool,
    positions: PositionCalculator,
}

impl PostgresWaitingRepository {
    pub fn new(pool: PgPool, positions: PositionCalculator) -> Self {
        Self { pool, positions }
    }

    async fn with_position(&self, row: PgRow) -> Result<ReservationWaiting, DomainError> {
        let id: i64 = column(&row, "id")?;
        let member: String = column(&row, "member_id")?;
        let schedule_id: i64 = column(&row, "schedule_id")?;

        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM (
                SELECT id FROM reservation_waiting
                WHERE schedule_id = $1 AND id <= $2
                ORDER BY id
                LIMIT $3
            ) w
            "#,
        )
        .bind(schedule_id)
        .bind(id)
        .bind(i64::from(self.positions.window()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to compute waiting position", e))?;

        Ok(ReservationWaiting::reconstitute(
            WaitingId::new(id),
            member_id(member)?,
            ScheduleId::new(schedule_id),
            self.positions.saturate(count),
        ))
    }
}

#[async_trait]
impl WaitingRepository for PostgresWaitingRepository {
    async fn save(
        &self,
        member_id: &MemberId,
        schedule_id: ScheduleId,
    ) -> Result<WaitingId, DomainError> {
        for _ in 0..MAX_SAVE_ATTEMPTS {
            let inserted: Option<(i64,)> = sqlx::query_as(
                r#"
                INSERT INTO reservation_waiting (member_id, schedule_id)
                VALUES ($1, $2)
                ON CONFLICT (member_id, schedule_id) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(member_id.as_str())
            .bind(schedule_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to insert waiting entry", e))?;

            if let Some((id,)) = inserted {
                return Ok(WaitingId::new(id));
            }

            // The conflicting row may be deleted before it can be read back
            let existing: Option<(i64,)> = sqlx::query_as(
                "SELECT id FROM reservation_waiting WHERE member_id = $1 AND schedule_id = $2",
            )
            .bind(member_id.as_str())
            .bind(schedule_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch existing waiting entry", e))?;

            if let Some((id,)) = existing {
                return Ok(WaitingId::new(id));
            }

            tracing::debug!(
                member_id = %member_id,
                schedule_id = %schedule_id,
                "Existing waiting entry vanished, retrying insert"
            );
        }

        Err(vanished_entry(member_id, schedule_id))
    }

    async fn find_by_id(&self, id: WaitingId) -> Result<Option<ReservationWaiting>, DomainError> {
        let row = sqlx::query(
            "SELECT id, member_id, schedule_id FROM reservation_waiting WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch waiting entry", e))?;

        match row {
            Some(row) => Ok(Some(self.with_position(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_head_by_schedule_id(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<ReservationWaiting>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, member_id, schedule_id
            FROM reservation_waiting
            WHERE schedule_id = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(schedule_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch waiting head", e))?;

        match row {
            Some(row) => Ok(Some(self.with_position(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<ReservationWaiting>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, member_id, schedule_id
            FROM reservation_waiting
            WHERE member_id = $1
            ORDER BY id
            "#,
        )
        .bind(member_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch waiting entries by member", e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(self.with_position(row).await?);
        }
        Ok(entries)
    }

    async fn delete_by_id(&self, id: WaitingId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM reservation_waiting WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete waiting entry", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::WaitingNotFound,
                format!("Waiting entry not found: {}", id),
            ));
        }

        Ok(())
    }
}
