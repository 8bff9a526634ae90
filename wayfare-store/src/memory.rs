use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;
use wayfare_core::booking::{
    Booking, BookingDetails, BookingStatus, Customer, FlightRequestRecord, ProviderCredential,
    StoredOffer, Traveler,
};
use wayfare_core::repository::{
    BookingRepository, CredentialRepository, FlightRequestRepository, OfferRepository, RepoResult,
};

#[derive(Default)]
struct Tables {
    customers: HashMap<Uuid, Customer>,
    bookings: HashMap<Uuid, Booking>,
    travelers: HashMap<Uuid, Vec<Traveler>>,
    offers: HashMap<String, StoredOffer>,
    requests: HashMap<Uuid, FlightRequestRecord>,
    credential: Option<ProviderCredential>,
}

/// Process-local store used when no database is configured, and in tests.
/// A single lock covers every table so multi-row writes stay atomic.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .values()
            .find(|c| c.email.expose() == email)
            .cloned())
    }

    async fn create_booking(
        &self,
        customer: &Customer,
        booking: &Booking,
        travelers: &[Traveler],
    ) -> RepoResult<Uuid> {
        let mut tables = self.tables.write().await;

        if tables.bookings.contains_key(&booking.id) {
            return Err(format!("booking {} already exists", booking.id).into());
        }

        let existing = tables
            .customers
            .values()
            .find(|c| c.email.expose() == customer.email.expose())
            .map(|c| c.id);

        let customer_id = match existing {
            Some(id) => id,
            None => {
                tables.customers.insert(customer.id, customer.clone());
                customer.id
            }
        };

        let mut stored = booking.clone();
        stored.customer_id = customer_id;
        tables.bookings.insert(stored.id, stored);

        let rows = travelers
            .iter()
            .cloned()
            .map(|mut t| {
                t.booking_id = booking.id;
                t
            })
            .collect();
        tables.travelers.insert(booking.id, rows);

        Ok(customer_id)
    }

    async fn get_booking(&self, id: Uuid) -> RepoResult<Option<BookingDetails>> {
        let tables = self.tables.read().await;

        let booking = match tables.bookings.get(&id) {
            Some(b) => b.clone(),
            None => return Ok(None),
        };
        let customer = tables
            .customers
            .get(&booking.customer_id)
            .cloned()
            .ok_or_else(|| format!("customer {} missing for booking {}", booking.customer_id, id))?;
        let travelers = tables.travelers.get(&id).cloned().unwrap_or_default();

        Ok(Some(BookingDetails {
            booking,
            customer,
            travelers,
        }))
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;

        match tables.bookings.get_mut(&id) {
            Some(booking) if booking.booking_status == from => {
                booking.booking_status = to;
                booking.modified_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn confirm_booking(
        &self,
        id: Uuid,
        order_id: &str,
        pnr: Option<&str>,
    ) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;

        match tables.bookings.get_mut(&id) {
            Some(booking) if booking.booking_status == BookingStatus::Pending => {
                booking.booking_status = BookingStatus::Confirmed;
                booking.order_id = Some(order_id.to_string());
                booking.pnr = pnr.map(str::to_string);
                booking.modified_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl OfferRepository for InMemoryStore {
    async fn save_offer(&self, offer: &StoredOffer) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables.offers.insert(offer.client_ref.clone(), offer.clone());
        Ok(())
    }

    async fn get_offer(&self, client_ref: &str) -> RepoResult<Option<StoredOffer>> {
        let tables = self.tables.read().await;
        Ok(tables.offers.get(client_ref).cloned())
    }

    async fn delete_offers_created_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.offers.len();
        tables.offers.retain(|_, offer| offer.created_at > cutoff);
        Ok((before - tables.offers.len()) as u64)
    }
}

#[async_trait]
impl FlightRequestRepository for InMemoryStore {
    async fn save_request(&self, request: &FlightRequestRecord) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> RepoResult<Option<FlightRequestRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.requests.get(&id).cloned())
    }

    async fn delete_requests_departing_before(&self, date: NaiveDate) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.requests.len();
        tables.requests.retain(|_, request| request.departure_date >= date);
        Ok((before - tables.requests.len()) as u64)
    }
}

#[async_trait]
impl CredentialRepository for InMemoryStore {
    async fn get_credential(&self) -> RepoResult<Option<ProviderCredential>> {
        let tables = self.tables.read().await;
        Ok(tables.credential.clone())
    }

    async fn save_credential(&self, credential: &ProviderCredential) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables.credential = Some(credential.clone());
        Ok(())
    }
}
