use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use wayfare_catalog::ReferenceCatalog;
use wayfare_core::booking::{FlightRequestRecord, StoredOffer};
use wayfare_core::gds::{FlightSearchRequest, PricingRequest};
use wayfare_core::provider::FlightProvider;
use wayfare_core::repository::{FlightRequestRepository, OfferRepository};
use wayfare_core::search::FlightSearchForm;
use wayfare_core::{CoreError, CoreResult};

use crate::composer;
use crate::itinerary::{compose_offer, decompose_offer};
use crate::models::{FlightOfferDetail, FlightOffersResult, PersistedRequest};

pub const REQUEST_NOT_FOUND: &str = "Flight request not found";
pub const INVALID_DEPARTURE_DATE: &str = "The departure date must be in yyyy-MM-dd format";
pub const MISSING_CLIENT_REF: &str = "The selected flight offer has no client ref";

/// Correlation reference sent with every provider call for one search.
pub fn new_client_ref() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Search, re-search and price verification against the provider.
pub struct ShoppingService {
    provider: Arc<dyn FlightProvider>,
    requests: Arc<dyn FlightRequestRepository>,
    offers: Arc<dyn OfferRepository>,
    catalog: Arc<ReferenceCatalog>,
}

impl ShoppingService {
    pub fn new(
        provider: Arc<dyn FlightProvider>,
        requests: Arc<dyn FlightRequestRepository>,
        offers: Arc<dyn OfferRepository>,
        catalog: Arc<ReferenceCatalog>,
    ) -> Self {
        Self {
            provider,
            requests,
            offers,
            catalog,
        }
    }

    pub async fn persist_request(&self, form: &FlightSearchForm) -> CoreResult<PersistedRequest> {
        let request = composer::compose(form)?;

        let departure_date = request
            .first_departure_date()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .ok_or_else(|| CoreError::bad_request(INVALID_DEPARTURE_DATE))?;

        let payload = serde_json::to_value(&request)
            .map_err(|e| CoreError::system("Failed to serialize flight request", e))?;

        let record = FlightRequestRecord {
            id: Uuid::new_v4(),
            customer_id: None,
            request: payload,
            departure_date,
            created_at: Utc::now(),
        };

        self.requests
            .save_request(&record)
            .await
            .map_err(|e| CoreError::system("Failed to persist flight request", e))?;

        info!("Persisted flight request {} departing {}", record.id, departure_date);
        Ok(PersistedRequest { request_id: record.id })
    }

    pub async fn fetch_offers_for_request(&self, request_id: Uuid) -> CoreResult<FlightOffersResult> {
        let record = self
            .requests
            .get_request(request_id)
            .await
            .map_err(|e| CoreError::system("Failed to load flight request", e))?
            .ok_or_else(|| CoreError::not_found(REQUEST_NOT_FOUND))?;

        let request = record
            .search_request()
            .map_err(|e| CoreError::system("Stored flight request is unreadable", e))?;

        self.search(&request).await
    }

    pub async fn fetch_offers(&self, form: &FlightSearchForm) -> CoreResult<FlightOffersResult> {
        let request = composer::compose(form)?;
        self.search(&request).await
    }

    async fn search(&self, request: &FlightSearchRequest) -> CoreResult<FlightOffersResult> {
        let client_ref = new_client_ref();
        let response = self.provider.search_offers(&client_ref, request).await?;

        let flight_offers = response
            .data
            .into_iter()
            .map(|offer| compose_offer(offer, &client_ref, &self.catalog))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::system("Provider returned an unreadable offer", e))?;

        info!("Search {} returned {} offers", client_ref, flight_offers.len());
        Ok(FlightOffersResult {
            meta: response.meta,
            flight_offers,
            dictionaries: response.dictionaries,
        })
    }

    /// Stores the selected offer under its client ref, then asks the provider
    /// to confirm the price. Price fields of the result come from the
    /// provider's answer; everything else is what the shopper sent.
    pub async fn verify_price(&self, detail: FlightOfferDetail) -> CoreResult<FlightOfferDetail> {
        if detail.client_ref.trim().is_empty() {
            return Err(CoreError::bad_request(MISSING_CLIENT_REF));
        }

        let offer = decompose_offer(&detail)?;

        let stored = StoredOffer::new(&detail.client_ref, &offer, Utc::now())
            .map_err(|e| CoreError::system("Failed to serialize flight offer", e))?;
        self.offers
            .save_offer(&stored)
            .await
            .map_err(|e| CoreError::system("Failed to store flight offer", e))?;

        let response = self
            .provider
            .price_offers(&detail.client_ref, &PricingRequest::for_offer(offer))
            .await?;

        let priced = match response.data.flight_offers.into_iter().next() {
            Some(priced) => priced,
            None => {
                warn!("Pricing for {} returned no offers", detail.client_ref);
                return Err(CoreError::system("Pricing response", "no flight offers returned"));
            }
        };

        let mut verified = detail;
        verified.price = priced.price;
        verified.pricing_options = priced.pricing_options;
        verified.validating_airline_codes = priced.validating_airline_codes;
        verified.traveler_pricings = priced.traveler_pricings;

        info!("Verified price for {}", verified.client_ref);
        Ok(verified)
    }
}
