//! ListReservationsHandler - Query handler for a theme's reservations on a day.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::foundation::ThemeId;
use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::ReservationRepository;

/// Query for reservations of a theme on a date.
#[derive(Debug, Clone)]
pub struct ListReservationsQuery {
    pub theme_id: ThemeId,
    pub date: NaiveDate,
}

/// Handler for listing reservations by theme and date.
pub struct ListReservationsHandler {
    repository: Arc<dyn ReservationRepository>,
}

impl ListReservationsHandler {
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListReservationsQuery,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let reservations = self
            .repository
            .find_by_theme_and_date(query.theme_id, query.date)
            .await?;
        debug!(
            theme_id = %query.theme_id,
            date = %query.date,
            count = reservations.len(),
            "Listed reservations"
        );
        Ok(reservations)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{member, Fixture};
    use super::*;
    use crate::domain::reservation::ReservationStatus;

    #[tokio::test]
    async fn lists_only_matching_theme_and_date() {
        let fx = Fixture::new().await;
        let id = fx.reservation(&member("m-1"), ReservationStatus::Approved).await;
        let other_day = fx
            .catalog
            .add_schedule(
                fx.theme.id,
                fx.schedule.date.succ_opt().unwrap(),
                fx.schedule.time,
            )
            .await
            .unwrap();
        ReservationRepository::save(
            fx.store.as_ref(),
            &member("m-2"),
            other_day.id,
            ReservationStatus::Approved,
        )
        .await
        .unwrap();

        let listed = ListReservationsHandler::new(fx.store.clone())
            .handle(ListReservationsQuery {
                theme_id: fx.theme.id,
                date: fx.schedule.date,
            })
            .await
            .unwrap();

        assert_eq!(listed.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![id]);
    }
}
