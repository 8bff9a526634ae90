use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;
use wayfare_core::booking::{
    Booking, BookingDetails, BookingStatus, Customer, StoredOffer, Traveler,
};
use wayfare_core::gds::FlightOffer;
use wayfare_core::provider::FlightProvider;
use wayfare_core::repository::{BookingRepository, OfferRepository};
use wayfare_core::{CoreError, CoreResult};
use wayfare_offer::OfferExpiryPolicy;
use wayfare_shared::Masked;

use crate::models::{InitializeBookingRequest, InitializedBooking, TravelerContact, TravelerCredentials};
use crate::payload::{self, AgencyProfile};
use crate::rules;

pub const OFFER_EXPIRED: &str = "The client ref is invalid or flight offer has expired";
pub const BOOKING_NOT_FOUND: &str = "Booking not found";
pub const BOOKING_PROCESSED: &str = "Specified booking has been processed";
pub const BOOKING_INCOMPLETE: &str = "Specified booking is yet to be completed";
pub const TRAVELERS_REQUIRED: &str = "At least one traveler is required for a booking";

/// Initialize, create and fetch flight bookings.
///
/// A booking is INITIALIZED until `create` claims it (PENDING) and the
/// provider accepts the order (CONFIRMED). A provider failure puts the
/// booking back to INITIALIZED so the shopper can try again.
pub struct BookingLifecycle {
    bookings: Arc<dyn BookingRepository>,
    offers: Arc<dyn OfferRepository>,
    provider: Arc<dyn FlightProvider>,
    expiry: OfferExpiryPolicy,
    agency: AgencyProfile,
}

impl BookingLifecycle {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        offers: Arc<dyn OfferRepository>,
        provider: Arc<dyn FlightProvider>,
        expiry: OfferExpiryPolicy,
        agency: AgencyProfile,
    ) -> Self {
        Self {
            bookings,
            offers,
            provider,
            expiry,
            agency,
        }
    }

    pub async fn initialize(&self, request: &InitializeBookingRequest) -> CoreResult<InitializedBooking> {
        self.initialize_at(request, Utc::now()).await
    }

    /// Same as [`initialize`](Self::initialize) with ages and expiry judged at `now`.
    pub async fn initialize_at(
        &self,
        request: &InitializeBookingRequest,
        now: DateTime<Utc>,
    ) -> CoreResult<InitializedBooking> {
        let stored = self
            .live_offer(&request.client_ref, now)
            .await?
            .ok_or_else(|| CoreError::not_found(OFFER_EXPIRED))?;
        let offer = stored
            .flight_offer()
            .map_err(|e| CoreError::system("Stored flight offer is unreadable", e))?;

        if request.traveler_credentials.is_empty() {
            return Err(CoreError::bad_request(TRAVELERS_REQUIRED));
        }

        let mut seen = HashSet::new();
        for traveler in &request.traveler_credentials {
            if !seen.insert(traveler.id.as_str()) {
                return Err(CoreError::bad_request(format!(
                    "The traveler id: {} is repeated for traveler: {}",
                    traveler.id,
                    traveler.full_name()
                )));
            }
            validate_traveler(traveler, &offer, now)?;
        }

        let customer = match self
            .bookings
            .find_customer_by_email(&request.traveler_contact.email)
            .await
            .map_err(|e| CoreError::system("Failed to look up customer", e))?
        {
            Some(existing) => existing,
            None => new_customer(&request.traveler_contact, now),
        };

        let booking = Booking::initialized(customer.id, &request.client_ref, now);
        let travelers: Vec<Traveler> = request
            .traveler_credentials
            .iter()
            .map(|t| Traveler {
                id: Uuid::new_v4(),
                booking_id: booking.id,
                traveler_id: t.id.clone(),
                traveler_type: t.traveler_type,
                title: t.title.clone(),
                first_name: t.first_name.clone(),
                last_name: t.last_name.clone(),
                gender: t.gender.clone(),
                date_of_birth: t.date_of_birth,
            })
            .collect();

        let customer_id = self
            .bookings
            .create_booking(&customer, &booking, &travelers)
            .await
            .map_err(|e| CoreError::system("Failed to initialize booking", e))?;

        info!(
            "Initialized booking {} for customer {} with {} travelers",
            booking.id,
            customer_id,
            travelers.len()
        );
        Ok(InitializedBooking {
            flight_booking_id: booking.id,
        })
    }

    /// Places the provider order for an INITIALIZED booking.
    pub async fn create(&self, booking_id: Uuid) -> CoreResult<BookingDetails> {
        let details = self.load(booking_id).await?;
        if details.booking.booking_status != BookingStatus::Initialized {
            return Err(CoreError::bad_request(BOOKING_PROCESSED));
        }

        let client_ref = details.booking.client_ref.clone();
        let stored = self
            .live_offer(&client_ref, Utc::now())
            .await?
            .ok_or_else(|| CoreError::bad_request(OFFER_EXPIRED))?;
        let offer = stored
            .flight_offer()
            .map_err(|e| CoreError::system("Stored flight offer is unreadable", e))?;

        let claimed = self
            .bookings
            .transition_status(booking_id, BookingStatus::Initialized, BookingStatus::Pending)
            .await
            .map_err(|e| CoreError::system("Failed to claim booking", e))?;
        if !claimed {
            return Err(CoreError::bad_request(BOOKING_PROCESSED));
        }

        let order = payload::build_order(offer, &details, &self.agency);

        let response = match self.provider.create_order(&client_ref, &order).await {
            Ok(response) => response,
            Err(err) => {
                self.release(booking_id).await;
                return Err(err.into());
            }
        };

        for warning in &response.warnings {
            warn!(
                "Order {} warning: {}",
                response.data.id,
                warning.detail.as_deref().unwrap_or_default()
            );
        }

        let pnr = response.data.pnr();
        if pnr.is_none() {
            warn!("Order {} returned no associated records", response.data.id);
        }

        // The order exists at the provider from here on
        let order_id = &response.data.id;
        let locator = pnr.unwrap_or("none");
        match self.bookings.confirm_booking(booking_id, order_id, pnr).await {
            Ok(true) => {}
            Ok(false) => error!(
                "Booking {} left PENDING before confirmation of order {} (PNR {})",
                booking_id, order_id, locator
            ),
            Err(e) => {
                error!(
                    "Booking {} placed as order {} (PNR {}) but could not be confirmed: {}",
                    booking_id, order_id, locator, e
                );
                return Err(CoreError::System(format!(
                    "Booking {} was placed as order {} (PNR {}) but could not be confirmed",
                    booking_id, order_id, locator
                )));
            }
        }

        info!("Booking {} confirmed as order {}", booking_id, order_id);
        self.load(booking_id).await
    }

    pub async fn fetch(&self, booking_id: Uuid) -> CoreResult<BookingDetails> {
        let details = self.load(booking_id).await?;
        if details.booking.booking_status == BookingStatus::Initialized {
            return Err(CoreError::bad_request(BOOKING_INCOMPLETE));
        }
        Ok(details)
    }

    async fn load(&self, booking_id: Uuid) -> CoreResult<BookingDetails> {
        self.bookings
            .get_booking(booking_id)
            .await
            .map_err(|e| CoreError::system("Failed to load booking", e))?
            .ok_or_else(|| CoreError::not_found(BOOKING_NOT_FOUND))
    }

    async fn live_offer(&self, client_ref: &str, now: DateTime<Utc>) -> CoreResult<Option<StoredOffer>> {
        let stored = self
            .offers
            .get_offer(client_ref)
            .await
            .map_err(|e| CoreError::system("Failed to load flight offer", e))?;
        Ok(self.expiry.live(stored, now))
    }

    async fn release(&self, booking_id: Uuid) {
        match self
            .bookings
            .transition_status(booking_id, BookingStatus::Pending, BookingStatus::Initialized)
            .await
        {
            Ok(true) => info!("Released booking {} after provider failure", booking_id),
            Ok(false) => warn!("Booking {} was not PENDING on release", booking_id),
            Err(e) => error!("Failed to release booking {}: {}", booking_id, e),
        }
    }
}

fn validate_traveler(
    traveler: &TravelerCredentials,
    offer: &FlightOffer,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    let pricing = offer.traveler_pricing(&traveler.id).ok_or_else(|| {
        CoreError::bad_request(format!(
            "The traveler id: {} is invalid for traveler: {}",
            traveler.id,
            traveler.full_name()
        ))
    })?;

    if pricing.traveler_type != traveler.traveler_type.as_str() {
        return Err(CoreError::bad_request(format!(
            "Invalid traveler type for {}. Ensure that the travelers' sequential order \
             correspond to traveler pricings in the selected flight offer",
            traveler.full_name()
        )));
    }

    if !rules::is_valid_date_of_birth(traveler.traveler_type, traveler.date_of_birth, now.date_naive()) {
        return Err(CoreError::bad_request(format!(
            "The specified date of birth for traveler: {} is not valid.",
            traveler.full_name()
        )));
    }

    Ok(())
}

fn new_customer(contact: &TravelerContact, now: DateTime<Utc>) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        email: Masked::new(contact.email.clone()),
        phone: Masked::new(contact.phone.clone()),
        country_dialing_code: contact.country_dialing_code.clone(),
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        created_at: now,
        modified_at: now,
    }
}
