use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::booking::{
    BookingDetails, BookingStatus, Customer, FlightRequestRecord, ProviderCredential, StoredOffer,
    Traveler, Booking,
};

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Repository trait for customers, bookings and their travelers
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>>;

    /// Writes the customer (inserted when its email is new), the booking and
    /// its travelers in one unit. Returns the id of the stored customer.
    async fn create_booking(
        &self,
        customer: &Customer,
        booking: &Booking,
        travelers: &[Traveler],
    ) -> RepoResult<Uuid>;

    async fn get_booking(&self, id: Uuid) -> RepoResult<Option<BookingDetails>>;

    /// Moves the booking from `from` to `to` only if it is still in `from`.
    /// Returns false when another caller got there first.
    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> RepoResult<bool>;

    /// Pending -> Confirmed, recording the provider order id and locator.
    async fn confirm_booking(
        &self,
        id: Uuid,
        order_id: &str,
        pnr: Option<&str>,
    ) -> RepoResult<bool>;
}

/// Repository trait for verified offers
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Replaces any offer already stored under the same client ref.
    async fn save_offer(&self, offer: &StoredOffer) -> RepoResult<()>;

    async fn get_offer(&self, client_ref: &str) -> RepoResult<Option<StoredOffer>>;

    async fn delete_offers_created_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}

/// Repository trait for persisted search requests
#[async_trait]
pub trait FlightRequestRepository: Send + Sync {
    async fn save_request(&self, request: &FlightRequestRecord) -> RepoResult<()>;

    async fn get_request(&self, id: Uuid) -> RepoResult<Option<FlightRequestRecord>>;

    async fn delete_requests_departing_before(&self, date: NaiveDate) -> RepoResult<u64>;
}

/// Repository trait for the singleton provider credential
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn get_credential(&self) -> RepoResult<Option<ProviderCredential>>;

    async fn save_credential(&self, credential: &ProviderCredential) -> RepoResult<()>;
}
