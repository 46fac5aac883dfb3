//! PostgreSQL implementation of CancellationPromoter.
//!
//! The status change, queue pop and reservation insert share one
//! transaction. The head row is locked with `FOR UPDATE`; if a concurrent
//! `DeleteWaiting` removes it between select and delete, the head is
//! re-selected a bounded number of times. Row locks are awaited for at most
//! the configured `lock_timeout`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::reservation_repository::{reservation_not_found, slot_conflict};
use super::rows::{is_lock_timeout, is_unique_violation, member_id};
use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, ReservationId, ScheduleId, WaitingId,
};
use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::ports::{CancellationPromoter, Promotion};

const MAX_HEAD_ATTEMPTS: usize = 3;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// PostgreSQL implementation of CancellationPromoter.
#[derive(Clone)]
pub struct PostgresCancellationPromoter {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PostgresCancellationPromoter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}

/// Value for `SET LOCAL lock_timeout`, never below 1ms since 0 disables it.
fn lock_timeout_setting(timeout: Duration) -> String {
    format!("{}ms", timeout.as_millis().max(1))
}

/// Maps an error raised while waiting on a row lock.
fn locked_row_error(context: &str, err: sqlx::Error) -> DomainError {
    if is_lock_timeout(&err) {
        DomainError::new(
            ErrorCode::ConcurrencyConflict,
            format!("{}: row is locked by a concurrent request", context),
        )
    } else {
        DomainError::database(context, err)
    }
}

async fn mark_cancel_approved(
    tx: &mut Transaction<'_, Postgres>,
    reservation_id: ReservationId,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        "UPDATE reservation SET status = $3 WHERE id = $1 AND status = $2",
    )
    .bind(reservation_id.value())
    .bind(ReservationStatus::CancelRequested.as_str())
    .bind(ReservationStatus::CancelApproved.as_str())
    .execute(&mut **tx)
    .await
    .map_err(|e| locked_row_error("Failed to approve cancellation", e))?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM reservation WHERE id = $1")
        .bind(reservation_id.value())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DomainError::database("Failed to fetch reservation", e))?;

    Err(match exists {
        Some(_) => DomainError::new(
            ErrorCode::ConcurrencyConflict,
            format!(
                "Reservation {} is no longer {}",
                reservation_id,
                ReservationStatus::CancelRequested
            ),
        ),
        None => reservation_not_found(reservation_id),
    })
}

/// Locks and removes the schedule's head entry, if the queue is non-empty.
async fn pop_head(
    tx: &mut Transaction<'_, Postgres>,
    schedule_id: ScheduleId,
) -> Result<Option<(WaitingId, MemberId)>, DomainError> {
    for attempt in 1..=MAX_HEAD_ATTEMPTS {
        let head: Option<(i64, String)> = sqlx::query_as(
            r#"
            SELECT id, member_id
            FROM reservation_waiting
            WHERE schedule_id = $1
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(schedule_id.value())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| locked_row_error("Failed to select waiting head", e))?;

        let Some((id, member)) = head else {
            // A locked head deleted concurrently is skipped by LIMIT 1 even
            // when later entries remain.
            let (remaining,): (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM reservation_waiting WHERE schedule_id = $1)",
            )
            .bind(schedule_id.value())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| DomainError::database("Failed to check waiting list", e))?;
            if remaining {
                tracing::debug!(schedule_id = %schedule_id, attempt, "Waiting head vanished, retrying");
                continue;
            }
            return Ok(None);
        };

        let deleted = sqlx::query("DELETE FROM reservation_waiting WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(|e| locked_row_error("Failed to remove waiting head", e))?;

        if deleted.rows_affected() == 1 {
            return Ok(Some((WaitingId::new(id), member_id(member)?)));
        }

        tracing::debug!(
            schedule_id = %schedule_id,
            waiting_id = id,
            attempt,
            "Waiting head vanished before delete, retrying"
        );
    }

    Err(DomainError::new(
        ErrorCode::ConcurrencyConflict,
        format!("Waiting list of schedule {} kept changing during promotion", schedule_id),
    ))
}

#[async_trait]
impl CancellationPromoter for PostgresCancellationPromoter {
    async fn approve_cancel_and_promote(
        &self,
        reservation_id: ReservationId,
        schedule_id: ScheduleId,
    ) -> Result<Option<Promotion>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(lock_timeout_setting(self.lock_timeout))
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to set lock timeout", e))?;

        mark_cancel_approved(&mut tx, reservation_id).await?;

        let promotion = match pop_head(&mut tx, schedule_id).await? {
            Some((waiting_id, member)) => {
                let inserted: Result<(i64,), sqlx::Error> = sqlx::query_as(
                    r#"
                    INSERT INTO reservation (member_id, schedule_id, status)
                    VALUES ($1, $2, $3)
                    RETURNING id
                    "#,
                )
                .bind(member.as_str())
                .bind(schedule_id.value())
                .bind(ReservationStatus::Approved.as_str())
                .fetch_one(&mut *tx)
                .await;

                let id = match inserted {
                    Ok((id,)) => ReservationId::new(id),
                    Err(e) if is_unique_violation(&e) => return Err(slot_conflict(schedule_id)),
                    Err(e) => {
                        return Err(DomainError::database("Failed to insert promoted reservation", e))
                    }
                };

                Some(Promotion {
                    waiting_id,
                    reservation: Reservation::reconstitute(
                        id,
                        member,
                        schedule_id,
                        ReservationStatus::Approved,
                    ),
                })
            }
            None => None,
        };

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(promotion)
    }
}
