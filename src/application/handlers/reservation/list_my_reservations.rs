//! ListMyReservationsHandler - Query handler for the caller's reservations.

use std::sync::Arc;

use crate::domain::foundation::MemberId;
use crate::domain::reservation::{Reservation, ReservationError};
use crate::ports::ReservationRepository;

/// Query for a member's reservations.
#[derive(Debug, Clone)]
pub struct ListMyReservationsQuery {
    pub member_id: MemberId,
}

/// Handler for listing a member's reservations.
pub struct ListMyReservationsHandler {
    repository: Arc<dyn ReservationRepository>,
}

impl ListMyReservationsHandler {
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListMyReservationsQuery,
    ) -> Result<Vec<Reservation>, ReservationError> {
        Ok(self.repository.find_by_member(&query.member_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{member, Fixture};
    use super::*;
    use crate::domain::reservation::ReservationStatus;

    #[tokio::test]
    async fn returns_only_callers_reservations() {
        let fx = Fixture::new().await;
        let (m1, m2) = (member("m-1"), member("m-2"));
        let mine = fx.reservation(&m1, ReservationStatus::Requested).await;
        fx.reservation(&m2, ReservationStatus::Requested).await;

        let listed = ListMyReservationsHandler::new(fx.store.clone())
            .handle(ListMyReservationsQuery { member_id: m1 })
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), mine);
    }
}
