//! PostgreSQL implementation of ReservationRepository.
//!
//! Slot exclusivity is enforced by the partial unique index
//! `uq_reservation_slot_holder`; a violation surfaces as `SlotConflict`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::rows::{is_unique_violation, row_to_reservation};
use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, ReservationId, ScheduleId, ThemeId,
};
use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::ports::ReservationRepository;

/// PostgreSQL implementation of ReservationRepository.
#[derive(Clone)]
pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    /// Creates a new PostgresReservationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) fn slot_conflict(schedule_id: ScheduleId) -> DomainError {
    DomainError::new(
        ErrorCode::SlotConflict,
        format!("Schedule {} already has a slot-holding reservation", schedule_id),
    )
    .with_detail("schedule_id", schedule_id.to_string())
}

pub(super) fn reservation_not_found(id: ReservationId) -> DomainError {
    DomainError::new(
        ErrorCode::ReservationNotFound,
        format!("Reservation not found: {}", id),
    )
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn save(
        &self,
        member_id: &MemberId,
        schedule_id: ScheduleId,
        status: ReservationStatus,
    ) -> Result<ReservationId, DomainError> {
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO reservation (member_id, schedule_id, status)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(member_id.as_str())
        .bind(schedule_id.value())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok((id,)) => Ok(ReservationId::new(id)),
            Err(e) if is_unique_violation(&e) => Err(slot_conflict(schedule_id)),
            Err(e) => Err(DomainError::database("Failed to insert reservation", e)),
        }
    }

    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, DomainError> {
        let row = sqlx::query(
            "SELECT id, member_id, schedule_id, status FROM reservation WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch reservation", e))?;

        row.map(row_to_reservation).transpose()
    }

    async fn find_by_theme_and_date(
        &self,
        theme_id: ThemeId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.member_id, r.schedule_id, r.status
            FROM reservation r
            JOIN schedule s ON s.id = r.schedule_id
            WHERE s.theme_id = $1 AND s.date = $2
            ORDER BY r.id
            "#,
        )
        .bind(theme_id.value())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch reservations by theme and date", e))?;

        rows.into_iter().map(row_to_reservation).collect()
    }

    async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Reservation>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, member_id, schedule_id, status
            FROM reservation
            WHERE member_id = $1
            ORDER BY id
            "#,
        )
        .bind(member_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch reservations by member", e))?;

        rows.into_iter().map(row_to_reservation).collect()
    }

    async fn find_slot_holder(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<Reservation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, member_id, schedule_id, status
            FROM reservation
            WHERE schedule_id = $1 AND status IN ('approved', 'cancel_requested')
            "#,
        )
        .bind(schedule_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch slot holder", e))?;

        row.map(row_to_reservation).transpose()
    }

    async fn update_status(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE reservation SET status = $3 WHERE id = $1 AND status = $2")
            .bind(id.value())
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&self.pool)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e) => {
                let schedule_id: Option<(i64,)> =
                    sqlx::query_as("SELECT schedule_id FROM reservation WHERE id = $1")
                        .bind(id.value())
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(|e| DomainError::database("Failed to fetch reservation", e))?;
                return Err(match schedule_id {
                    Some((schedule_id,)) => slot_conflict(ScheduleId::new(schedule_id)),
                    None => reservation_not_found(id),
                });
            }
            Err(e) => return Err(DomainError::database("Failed to update reservation status", e)),
        };

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                Some(current) => Err(DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!("Reservation {} is {}, expected {}", id, current.status(), from),
                )),
                None => Err(reservation_not_found(id)),
            };
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: ReservationId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM reservation WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete reservation", e))?;

        if result.rows_affected() == 0 {
            return Err(reservation_not_found(id));
        }

        Ok(())
    }
}
