//! Shared fixtures for reservation handler tests.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::adapters::memory::{InMemoryCatalog, InMemoryReservationStore};
use crate::domain::catalog::{Schedule, Theme};
use crate::domain::foundation::{CommandMetadata, MemberId, ReservationId, ScheduleId, WaitingId};
use crate::domain::reservation::{PositionCalculator, ReservationStatus};
use crate::ports::{ReservationRepository, WaitingRepository};

pub(super) struct Fixture {
    pub catalog: InMemoryCatalog,
    pub store: Arc<InMemoryReservationStore>,
    pub theme: Theme,
    pub schedule: Schedule,
}

impl Fixture {
    pub async fn new() -> Self {
        let catalog = InMemoryCatalog::new();
        let theme = catalog
            .add_theme("Sunken Lab", "Escape the flooded laboratory", 22000)
            .await;
        let schedule = catalog
            .add_schedule(
                theme.id,
                NaiveDate::from_ymd_opt(2026, 11, 14).unwrap(),
                NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            )
            .await
            .unwrap();
        let store = Arc::new(InMemoryReservationStore::new(
            catalog.clone(),
            PositionCalculator::default(),
        ));
        Self {
            catalog,
            store,
            theme,
            schedule,
        }
    }

    pub async fn reservation(&self, member: &MemberId, status: ReservationStatus) -> ReservationId {
        ReservationRepository::save(self.store.as_ref(), member, self.schedule.id, status)
            .await
            .unwrap()
    }

    pub async fn wait(&self, member: &MemberId, schedule_id: ScheduleId) -> WaitingId {
        WaitingRepository::save(self.store.as_ref(), member, schedule_id)
            .await
            .unwrap()
    }
}

pub(super) fn member(id: &str) -> MemberId {
    MemberId::new(id).unwrap()
}

pub(super) fn metadata(member_id: &MemberId) -> CommandMetadata {
    CommandMetadata::test_fixture(member_id)
}
