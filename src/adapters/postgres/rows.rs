//! Row decoding shared by the reservation adapters.

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::foundation::{DomainError, MemberId, ReservationId, ScheduleId};
use crate::domain::reservation::{Reservation, ReservationStatus};

pub(super) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(&format!("Failed to read column {}", name), e))
}

pub(super) fn member_id(raw: String) -> Result<MemberId, DomainError> {
    MemberId::new(raw).map_err(|e| DomainError::database("Invalid member_id in row", e))
}

pub(super) fn row_to_reservation(row: PgRow) -> Result<Reservation, DomainError> {
    let id: i64 = column(&row, "id")?;
    let member: String = column(&row, "member_id")?;
    let schedule_id: i64 = column(&row, "schedule_id")?;
    let status: String = column(&row, "status")?;

    Ok(Reservation::reconstitute(
        ReservationId::new(id),
        member_id(member)?,
        ScheduleId::new(schedule_id),
        ReservationStatus::parse(&status)?,
    ))
}

/// True if `err` is a unique-constraint violation.
pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// True if `err` is PostgreSQL `lock_not_available` (55P03), raised when
/// `lock_timeout` expires.
pub(super) fn is_lock_timeout(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("55P03"))
}
