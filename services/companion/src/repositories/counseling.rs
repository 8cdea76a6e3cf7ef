//! services/companion/src/repositories/counseling.rs

use chrono::Utc;
use mindcare_core::domain::{BookingRequest, BookingStatus, CounselingBooking, ServiceOffering};
use mindcare_core::ids::EntryId;
use mindcare_core::validation::ValidationError;
use tracing::info;

use super::{RepoResult, Repository};
use crate::records::BookingRecord;
use crate::store::{keys, RecordStore};

/// Counseling booking requests, stored under `counselingBookings`.
#[derive(Clone)]
pub struct CounselingRepository {
    inner: Repository<BookingRecord>,
}

impl CounselingRepository {
    pub fn new(store: RecordStore, write_retries: u32) -> Self {
        Self {
            inner: Repository::new(store, keys::COUNSELING_BOOKINGS, "booking", write_retries),
        }
    }

    pub fn bookings(&self) -> Vec<CounselingBooking> {
        self.inner.load_all()
    }

    /// Books `service` with the details in `request`. New bookings start out
    /// `Pending`.
    pub fn book(
        &self,
        service: Option<ServiceOffering>,
        request: BookingRequest,
    ) -> RepoResult<Vec<CounselingBooking>> {
        let service = service.ok_or(ValidationError::ServiceNotSelected)?;
        request.validate()?;

        let booking = CounselingBooking {
            id: EntryId::UNASSIGNED,
            service,
            request,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        let title = booking.service.title.clone();
        let bookings = self.inner.append(booking)?;
        info!(service = %title, total = bookings.len(), "Counseling session booked");
        Ok(bookings)
    }
}
