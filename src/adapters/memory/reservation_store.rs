//! In-memory reservation and waiting-list store.
//!
//! Reservations and waiting entries live behind one lock so the
//! approve-cancel promotion runs as a single unit of work, the same
//! guarantee the PostgreSQL adapter gets from a transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::InMemoryCatalog;
use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, ReservationId, ScheduleId, ThemeId, WaitingId,
};
use crate::domain::reservation::{
    PositionCalculator, Reservation, ReservationStatus, ReservationWaiting, WaitPosition,
};
use crate::ports::{CancellationPromoter, Promotion, ReservationRepository, WaitingRepository};

#[derive(Debug, Clone)]
struct WaitingRow {
    member_id: MemberId,
    schedule_id: ScheduleId,
}

#[derive(Debug, Default)]
struct StoreState {
    reservations: BTreeMap<ReservationId, Reservation>,
    waitings: BTreeMap<WaitingId, WaitingRow>,
    /// (schedule, insertion marker) index; iteration order is queue order.
    queues: BTreeSet<(ScheduleId, WaitingId)>,
    next_reservation_id: i64,
    next_waiting_id: i64,
}

impl StoreState {
    fn slot_holder(&self, schedule_id: ScheduleId) -> Option<&Reservation> {
        self.reservations
            .values()
            .find(|r| r.schedule_id() == schedule_id && r.status().holds_slot())
    }

    fn ensure_slot_free(
        &self,
        schedule_id: ScheduleId,
        except: Option<ReservationId>,
    ) -> Result<(), DomainError> {
        match self.slot_holder(schedule_id) {
            Some(holder) if Some(holder.id()) != except => Err(DomainError::new(
                ErrorCode::SlotConflict,
                format!("Schedule {} already has a slot-holding reservation", schedule_id),
            )
            .with_detail("schedule_id", schedule_id.to_string())
            .with_detail("holder_id", holder.id().to_string())),
            _ => Ok(()),
        }
    }

    fn insert_reservation(
        &mut self,
        member_id: &MemberId,
        schedule_id: ScheduleId,
        status: ReservationStatus,
    ) -> Result<Reservation, DomainError> {
        if status.holds_slot() {
            self.ensure_slot_free(schedule_id, None)?;
        }
        self.next_reservation_id += 1;
        let reservation = Reservation::reconstitute(
            ReservationId::new(self.next_reservation_id),
            member_id.clone(),
            schedule_id,
            status,
        );
        self.reservations.insert(reservation.id(), reservation.clone());
        Ok(reservation)
    }

    fn queue(&self, schedule_id: ScheduleId) -> impl Iterator<Item = WaitingId> + '_ {
        self.queues
            .range((schedule_id, WaitingId::new(i64::MIN))..=(schedule_id, WaitingId::new(i64::MAX)))
            .map(|(_, id)| *id)
    }

    fn waiting(&self, positions: &PositionCalculator, id: WaitingId) -> Option<ReservationWaiting> {
        self.waitings.get(&id).map(|row| {
            let position: WaitPosition = positions.position_in(self.queue(row.schedule_id), id);
            ReservationWaiting::reconstitute(id, row.member_id.clone(), row.schedule_id, position)
        })
    }

    fn remove_waiting(&mut self, id: WaitingId) -> Option<WaitingRow> {
        let row = self.waitings.remove(&id)?;
        self.queues.remove(&(row.schedule_id, id));
        Some(row)
    }
}

fn reservation_not_found(id: ReservationId) -> DomainError {
    DomainError::new(
        ErrorCode::ReservationNotFound,
        format!("Reservation not found: {}", id),
    )
}

/// In-memory implementation of the reservation, waiting and promotion ports.
#[derive(Debug, Clone)]
pub struct InMemoryReservationStore {
    state: Arc<RwLock<StoreState>>,
    catalog: InMemoryCatalog,
    positions: PositionCalculator,
}

impl InMemoryReservationStore {
    /// Creates an empty store resolving schedules through `catalog`.
    pub fn new(catalog: InMemoryCatalog, positions: PositionCalculator) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            catalog,
            positions,
        }
    }

    /// Number of reservations with `status` on a schedule.
    pub async fn count_with_status(&self, schedule_id: ScheduleId, status: ReservationStatus) -> usize {
        self.state
            .read()
            .await
            .reservations
            .values()
            .filter(|r| r.schedule_id() == schedule_id && r.status() == status)
            .count()
    }

    /// Number of waiting entries queued on a schedule.
    pub async fn queue_len(&self, schedule_id: ScheduleId) -> usize {
        self.state.read().await.queue(schedule_id).count()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationStore {
    async fn save(
        &self,
        member_id: &MemberId,
        schedule_id: ScheduleId,
        status: ReservationStatus,
    ) -> Result<ReservationId, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.insert_reservation(member_id, schedule_id, status)?.id())
    }

    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, DomainError> {
        Ok(self.state.read().await.reservations.get(&id).cloned())
    }

    async fn find_by_theme_and_date(
        &self,
        theme_id: ThemeId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, DomainError> {
        let schedule_ids = self.catalog.schedule_ids_for(theme_id, date).await;
        Ok(self
            .state
            .read()
            .await
            .reservations
            .values()
            .filter(|r| schedule_ids.contains(&r.schedule_id()))
            .cloned()
            .collect())
    }

    async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Reservation>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .reservations
            .values()
            .filter(|r| r.member_id() == member_id)
            .cloned()
            .collect())
    }

    async fn find_slot_holder(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<Reservation>, DomainError> {
        Ok(self.state.read().await.slot_holder(schedule_id).cloned())
    }

    async fn update_status(
        &self,
        id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let current = state
            .reservations
            .get(&id)
            .ok_or_else(|| reservation_not_found(id))?;

        if current.status() != from {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("Reservation {} is {}, expected {}", id, current.status(), from),
            ));
        }
        let schedule_id = current.schedule_id();
        if to.holds_slot() {
            state.ensure_slot_free(schedule_id, Some(id))?;
        }

        let updated = Reservation::reconstitute(id, current.member_id().clone(), schedule_id, to);
        state.reservations.insert(id, updated);
        Ok(())
    }

    async fn delete_by_id(&self, id: ReservationId) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .reservations
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| reservation_not_found(id))
    }
}

#[async_trait]
impl WaitingRepository for InMemoryReservationStore {
    async fn save(
        &self,
        member_id: &MemberId,
        schedule_id: ScheduleId,
    ) -> Result<WaitingId, DomainError> {
        let mut state = self.state.write().await;
        let existing = state
            .waitings
            .iter()
            .find(|(_, row)| row.schedule_id == schedule_id && &row.member_id == member_id)
            .map(|(id, _)| *id);
        if let Some(id) = existing {
            return Ok(id);
        }

        state.next_waiting_id += 1;
        let id = WaitingId::new(state.next_waiting_id);
        state.waitings.insert(
            id,
            WaitingRow {
                member_id: member_id.clone(),
                schedule_id,
            },
        );
        state.queues.insert((schedule_id, id));
        Ok(id)
    }

    async fn find_by_id(&self, id: WaitingId) -> Result<Option<ReservationWaiting>, DomainError> {
        Ok(self.state.read().await.waiting(&self.positions, id))
    }

    async fn find_head_by_schedule_id(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Option<ReservationWaiting>, DomainError> {
        let state = self.state.read().await;
        let head = state
            .queue(schedule_id)
            .next()
            .and_then(|id| state.waiting(&self.positions, id));
        Ok(head)
    }

    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<ReservationWaiting>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .waitings
            .iter()
            .filter(|(_, row)| &row.member_id == member_id)
            .filter_map(|(id, _)| state.waiting(&self.positions, *id))
            .collect())
    }

    async fn delete_by_id(&self, id: WaitingId) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .remove_waiting(id)
            .map(|_| ())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::WaitingNotFound,
                    format!("Waiting entry not found: {}", id),
                )
            })
    }
}

#[async_trait]
impl CancellationPromoter for InMemoryReservationStore {
    async fn approve_cancel_and_promote(
        &self,
        reservation_id: ReservationId,
        schedule_id: ScheduleId,
    ) -> Result<Option<Promotion>, DomainError> {
        let mut state = self.state.write().await;

        let current = state
            .reservations
            .get(&reservation_id)
            .ok_or_else(|| reservation_not_found(reservation_id))?;
        if current.status() != ReservationStatus::CancelRequested {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "Reservation {} is {}, expected {}",
                    reservation_id,
                    current.status(),
                    ReservationStatus::CancelRequested
                ),
            ));
        }
        let cancelled = Reservation::reconstitute(
            reservation_id,
            current.member_id().clone(),
            current.schedule_id(),
            ReservationStatus::CancelApproved,
        );
        state.reservations.insert(reservation_id, cancelled);

        let Some(head_id) = state.queue(schedule_id).next() else {
            return Ok(None);
        };
        let Some(head) = state.remove_waiting(head_id) else {
            return Ok(None);
        };
        let reservation =
            state.insert_reservation(&head.member_id, schedule_id, ReservationStatus::Approved)?;

        Ok(Some(Promotion {
            waiting_id: head_id,
            reservation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn member(id: &str) -> MemberId {
        MemberId::new(id).unwrap()
    }

    async fn setup() -> (InMemoryReservationStore, ScheduleId) {
        let catalog = InMemoryCatalog::new();
        let theme = catalog.add_theme("Lost Library", "", 20000).await;
        let schedule = catalog
            .add_schedule(
                theme.id,
                NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
                NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            )
            .await
            .unwrap();
        (
            InMemoryReservationStore::new(catalog, PositionCalculator::default()),
            schedule.id,
        )
    }

    #[tokio::test]
    async fn second_slot_holder_is_a_conflict() {
        let (store, schedule) = setup().await;
        ReservationRepository::save(&store, &member("m-1"), schedule, ReservationStatus::Approved)
            .await
            .unwrap();

        let err = ReservationRepository::save(
            &store,
            &member("m-2"),
            schedule,
            ReservationStatus::Approved,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::SlotConflict);
        assert_eq!(store.count_with_status(schedule, ReservationStatus::Approved).await, 1);
    }

    #[tokio::test]
    async fn requested_reservations_do_not_hold_the_slot() {
        let (store, schedule) = setup().await;
        for m in ["m-1", "m-2"] {
            ReservationRepository::save(&store, &member(m), schedule, ReservationStatus::Requested)
                .await
                .unwrap();
        }
        assert!(store.find_slot_holder(schedule).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_status_is_compare_and_set() {
        let (store, schedule) = setup().await;
        let id = ReservationRepository::save(
            &store,
            &member("m-1"),
            schedule,
            ReservationStatus::Requested,
        )
        .await
        .unwrap();

        let err = store
            .update_status(id, ReservationStatus::Approved, ReservationStatus::CancelRequested)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);

        store
            .update_status(id, ReservationStatus::Requested, ReservationStatus::Approved)
            .await
            .unwrap();
        let stored = ReservationRepository::find_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(stored.status(), ReservationStatus::Approved);
    }

    #[tokio::test]
    async fn approving_into_an_occupied_slot_conflicts() {
        let (store, schedule) = setup().await;
        ReservationRepository::save(&store, &member("m-1"), schedule, ReservationStatus::Approved)
            .await
            .unwrap();
        let pending = ReservationRepository::save(
            &store,
            &member("m-2"),
            schedule,
            ReservationStatus::Requested,
        )
        .await
        .unwrap();

        let err = store
            .update_status(pending, ReservationStatus::Requested, ReservationStatus::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotConflict);
    }

    #[tokio::test]
    async fn waiting_positions_follow_insertion_order() {
        let (store, schedule) = setup().await;
        let a = WaitingRepository::save(&store, &member("a"), schedule).await.unwrap();
        let b = WaitingRepository::save(&store, &member("b"), schedule).await.unwrap();
        let c = WaitingRepository::save(&store, &member("c"), schedule).await.unwrap();

        for (id, expected) in [(a, 1), (b, 2), (c, 3)] {
            let entry = WaitingRepository::find_by_id(&store, id).await.unwrap().unwrap();
            assert_eq!(entry.position().value(), expected);
        }
    }

    #[tokio::test]
    async fn deleting_head_shifts_positions() {
        let (store, schedule) = setup().await;
        let a = WaitingRepository::save(&store, &member("a"), schedule).await.unwrap();
        let b = WaitingRepository::save(&store, &member("b"), schedule).await.unwrap();

        WaitingRepository::delete_by_id(&store, a).await.unwrap();

        let entry = WaitingRepository::find_by_id(&store, b).await.unwrap().unwrap();
        assert_eq!(entry.position().value(), 1);
        let head = store.find_head_by_schedule_id(schedule).await.unwrap().unwrap();
        assert_eq!(head.id(), b);
    }

    #[tokio::test]
    async fn waiting_twice_returns_the_same_entry() {
        let (store, schedule) = setup().await;
        let first = WaitingRepository::save(&store, &member("a"), schedule).await.unwrap();
        let second = WaitingRepository::save(&store, &member("a"), schedule).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.queue_len(schedule).await, 1);
    }

    #[tokio::test]
    async fn deleting_missing_waiting_is_not_found() {
        let (store, _) = setup().await;
        let err = WaitingRepository::delete_by_id(&store, WaitingId::new(9))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::WaitingNotFound);
    }

    #[tokio::test]
    async fn promotion_moves_head_into_the_slot() {
        let (store, schedule) = setup().await;
        let original = ReservationRepository::save(
            &store,
            &member("m-1"),
            schedule,
            ReservationStatus::Approved,
        )
        .await
        .unwrap();
        store
            .update_status(original, ReservationStatus::Approved, ReservationStatus::CancelRequested)
            .await
            .unwrap();
        let head = WaitingRepository::save(&store, &member("m-2"), schedule).await.unwrap();
        let next = WaitingRepository::save(&store, &member("m-3"), schedule).await.unwrap();

        let promotion = store
            .approve_cancel_and_promote(original, schedule)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(promotion.waiting_id, head);
        assert_eq!(promotion.reservation.member_id(), &member("m-2"));
        assert_eq!(promotion.reservation.status(), ReservationStatus::Approved);
        let cancelled = ReservationRepository::find_by_id(&store, original)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status(), ReservationStatus::CancelApproved);
        let remaining = WaitingRepository::find_by_id(&store, next).await.unwrap().unwrap();
        assert_eq!(remaining.position().value(), 1);
    }

    #[tokio::test]
    async fn promotion_requires_cancel_requested() {
        let (store, schedule) = setup().await;
        let id = ReservationRepository::save(
            &store,
            &member("m-1"),
            schedule,
            ReservationStatus::Approved,
        )
        .await
        .unwrap();
        WaitingRepository::save(&store, &member("m-2"), schedule).await.unwrap();

        let err = store.approve_cancel_and_promote(id, schedule).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert_eq!(store.queue_len(schedule).await, 1);
    }

    #[tokio::test]
    async fn head_is_the_oldest_queued_entry() {
        let (store, schedule) = setup().await;
        assert!(store.find_head_by_schedule_id(schedule).await.unwrap().is_none());

        let first = WaitingRepository::save(&store, &member("a"), schedule).await.unwrap();
        WaitingRepository::save(&store, &member("b"), schedule).await.unwrap();

        let head = store.find_head_by_schedule_id(schedule).await.unwrap().unwrap();
        assert_eq!(head.id(), first);
        assert!(head.position().is_head());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_leave_one_slot_holder() {
        let (store, schedule) = setup().await;

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    ReservationRepository::save(
                        &store,
                        &member(&format!("m-{}", i)),
                        schedule,
                        ReservationStatus::Approved,
                    )
                    .await
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert_eq!(e.code, ErrorCode::SlotConflict),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count_with_status(schedule, ReservationStatus::Approved).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn promotion_racing_head_removal_promotes_at_most_once() {
        for _ in 0..32 {
            let (store, schedule) = setup().await;
            let original = ReservationRepository::save(
                &store,
                &member("m-1"),
                schedule,
                ReservationStatus::Approved,
            )
            .await
            .unwrap();
            store
                .update_status(original, ReservationStatus::Approved, ReservationStatus::CancelRequested)
                .await
                .unwrap();
            let head = WaitingRepository::save(&store, &member("m-2"), schedule).await.unwrap();

            let promoter = store.clone();
            let remover = store.clone();
            let (promoted, removed) = tokio::join!(
                tokio::spawn(async move { promoter.approve_cancel_and_promote(original, schedule).await }),
                tokio::spawn(async move { WaitingRepository::delete_by_id(&remover, head).await }),
            );
            let promotion = promoted.unwrap().unwrap();
            let removed = removed.unwrap();

            // Exactly one side wins the head
            assert_ne!(promotion.is_some(), removed.is_ok());
            if let Err(e) = removed {
                assert_eq!(e.code, ErrorCode::WaitingNotFound);
            }
            assert_eq!(
                store.count_with_status(schedule, ReservationStatus::Approved).await,
                usize::from(promotion.is_some())
            );
            assert_eq!(
                store.count_with_status(schedule, ReservationStatus::CancelApproved).await,
                1
            );
            assert_eq!(store.queue_len(schedule).await, 0);
        }
    }
}
