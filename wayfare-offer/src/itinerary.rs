use wayfare_catalog::ReferenceCatalog;
use wayfare_core::gds::{FlightOffer, Itinerary, Operating, Segment, SegmentEndpoint};
use wayfare_core::{CoreError, CoreResult};

use crate::duration::{self, DurationError};
use crate::models::{EndpointDetail, FlightOfferDetail, ItineraryDetail, OperatingDetail, SegmentDetail};

/// Provider offer -> storefront offer.
pub fn compose_offer(
    offer: FlightOffer,
    client_ref: &str,
    catalog: &ReferenceCatalog,
) -> Result<FlightOfferDetail, DurationError> {
    let itineraries = compose_itineraries(&offer.itineraries, catalog)?;
    let duration_in_minutes = itineraries.iter().map(|i| i.duration_in_minutes).sum::<i64>();

    Ok(FlightOfferDetail {
        offer_type: offer.offer_type,
        id: offer.id,
        source: offer.source,
        client_ref: client_ref.to_string(),
        instant_ticketing_required: offer.instant_ticketing_required,
        non_homogeneous: offer.non_homogeneous,
        one_way: offer.one_way,
        last_ticketing_date: offer.last_ticketing_date,
        last_ticketing_date_time: offer.last_ticketing_date_time,
        number_of_bookable_seats: offer.number_of_bookable_seats,
        duration_in_minutes,
        itineraries,
        price: offer.price,
        pricing_options: offer.pricing_options,
        validating_airline_codes: offer.validating_airline_codes,
        traveler_pricings: offer.traveler_pricings,
    })
}

/// Storefront offer -> provider offer, for pricing and booking.
pub fn decompose_offer(detail: &FlightOfferDetail) -> CoreResult<FlightOffer> {
    Ok(FlightOffer {
        offer_type: detail.offer_type.clone(),
        id: detail.id.clone(),
        source: detail.source.clone(),
        instant_ticketing_required: detail.instant_ticketing_required,
        non_homogeneous: detail.non_homogeneous,
        one_way: detail.one_way,
        last_ticketing_date: detail.last_ticketing_date.clone(),
        last_ticketing_date_time: detail.last_ticketing_date_time.clone(),
        number_of_bookable_seats: detail.number_of_bookable_seats,
        itineraries: decompose_itineraries(&detail.itineraries)?,
        price: detail.price.clone(),
        pricing_options: detail.pricing_options.clone(),
        validating_airline_codes: detail.validating_airline_codes.clone(),
        traveler_pricings: detail.traveler_pricings.clone(),
    })
}

pub fn compose_itineraries(
    itineraries: &[Itinerary],
    catalog: &ReferenceCatalog,
) -> Result<Vec<ItineraryDetail>, DurationError> {
    itineraries
        .iter()
        .map(|itinerary| -> Result<ItineraryDetail, DurationError> {
            let segments = itinerary
                .segments
                .iter()
                .map(|segment| compose_segment(segment, catalog))
                .collect::<Result<Vec<_>, _>>()?;

            let (duration, duration_in_minutes) = match itinerary.duration.as_deref() {
                Some(iso) => (Some(duration::to_text(iso)?), duration::to_minutes(iso)?),
                None => (None, 0),
            };

            Ok(ItineraryDetail {
                duration,
                duration_in_minutes,
                segments,
            })
        })
        .collect()
}

fn compose_segment(segment: &Segment, catalog: &ReferenceCatalog) -> Result<SegmentDetail, DurationError> {
    Ok(SegmentDetail {
        departure: compose_endpoint(&segment.departure, catalog),
        arrival: compose_endpoint(&segment.arrival, catalog),
        carrier: catalog.airline(&segment.carrier_code).cloned(),
        number: segment.number.clone(),
        aircraft: segment.aircraft.clone(),
        operating: segment.operating.as_ref().map(|operating| OperatingDetail {
            carrier: operating
                .carrier_code
                .as_deref()
                .and_then(|code| catalog.airline(code))
                .cloned(),
        }),
        duration: segment.duration.as_deref().map(duration::to_text).transpose()?,
        id: segment.id.clone(),
        number_of_stops: segment.number_of_stops,
        blacklisted_in_eu: segment.blacklisted_in_eu,
    })
}

fn compose_endpoint(endpoint: &SegmentEndpoint, catalog: &ReferenceCatalog) -> EndpointDetail {
    EndpointDetail {
        location: catalog.airport(&endpoint.iata_code).cloned(),
        terminal: endpoint.terminal.clone(),
        at: endpoint.at,
    }
}

pub fn decompose_itineraries(details: &[ItineraryDetail]) -> CoreResult<Vec<Itinerary>> {
    details
        .iter()
        .map(|detail| -> CoreResult<Itinerary> {
            let segments = detail
                .segments
                .iter()
                .map(decompose_segment)
                .collect::<CoreResult<Vec<_>>>()?;

            Ok(Itinerary {
                duration: detail.duration.as_deref().map(text_to_iso).transpose()?,
                segments,
            })
        })
        .collect()
}

fn decompose_segment(detail: &SegmentDetail) -> CoreResult<Segment> {
    let carrier = detail.carrier.as_ref().ok_or_else(|| {
        CoreError::bad_request(format!("Segment {} has no recognised carrier", detail.id))
    })?;

    Ok(Segment {
        departure: decompose_endpoint(&detail.departure, &detail.id, "departure")?,
        arrival: decompose_endpoint(&detail.arrival, &detail.id, "arrival")?,
        carrier_code: carrier.iata_code.clone(),
        number: detail.number.clone(),
        aircraft: detail.aircraft.clone(),
        operating: detail.operating.as_ref().map(|operating| Operating {
            carrier_code: operating.carrier.as_ref().map(|c| c.iata_code.clone()),
        }),
        duration: detail.duration.as_deref().map(text_to_iso).transpose()?,
        id: detail.id.clone(),
        number_of_stops: detail.number_of_stops,
        blacklisted_in_eu: detail.blacklisted_in_eu,
    })
}

fn decompose_endpoint(detail: &EndpointDetail, segment_id: &str, side: &str) -> CoreResult<SegmentEndpoint> {
    let location = detail.location.as_ref().ok_or_else(|| {
        CoreError::bad_request(format!("Segment {} has no recognised {} airport", segment_id, side))
    })?;

    Ok(SegmentEndpoint {
        iata_code: location.iata_code.clone(),
        terminal: detail.terminal.clone(),
        at: detail.at,
    })
}

fn text_to_iso(text: &str) -> CoreResult<String> {
    duration::to_iso(text).map_err(|e| CoreError::bad_request(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog::embedded().unwrap()
    }

    fn provider_offer() -> FlightOffer {
        serde_json::from_value(json!({
            "type": "flight-offer",
            "id": "4",
            "source": "GDS",
            "lastTicketingDate": "2024-02-20",
            "numberOfBookableSeats": 7,
            "itineraries": [
                {
                    "duration": "PT9H45M",
                    "segments": [
                        {
                            "departure": { "iataCode": "LOS", "terminal": "I", "at": "2024-02-27T10:05:00" },
                            "arrival": { "iataCode": "IST", "at": "2024-02-27T17:20:00" },
                            "carrierCode": "TK",
                            "number": "624",
                            "aircraft": { "code": "333" },
                            "operating": { "carrierCode": "TK" },
                            "duration": "PT6H15M",
                            "id": "1",
                            "numberOfStops": 0
                        },
                        {
                            "departure": { "iataCode": "IST", "at": "2024-02-27T18:40:00" },
                            "arrival": { "iataCode": "LHR", "terminal": "2", "at": "2024-02-27T19:50:00" },
                            "carrierCode": "TK",
                            "number": "1971",
                            "duration": "PT4H10M",
                            "id": "2",
                            "numberOfStops": 0
                        }
                    ]
                },
                {
                    "duration": "PT7H",
                    "segments": [
                        {
                            "departure": { "iataCode": "LHR", "terminal": "5", "at": "2024-03-10T22:00:00" },
                            "arrival": { "iataCode": "LOS", "at": "2024-03-11T05:00:00" },
                            "carrierCode": "BA",
                            "number": "75",
                            "duration": "PT7H",
                            "id": "3",
                            "numberOfStops": 0
                        }
                    ]
                }
            ],
            "price": { "currency": "USD", "total": "1204.10", "base": "600.00", "grandTotal": "1204.10" },
            "validatingAirlineCodes": ["TK"],
            "travelerPricings": [{
                "travelerId": "1",
                "fareOption": "STANDARD",
                "travelerType": "ADULT",
                "price": { "currency": "USD", "total": "1204.10" }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_compose_resolves_codes_and_durations() {
        let detail = compose_offer(provider_offer(), "ref-42", &catalog()).unwrap();

        assert_eq!(detail.client_ref, "ref-42");
        assert_eq!(detail.itineraries[0].duration.as_deref(), Some("9h 45m"));
        assert_eq!(detail.itineraries[0].duration_in_minutes, 585);
        assert_eq!(detail.itineraries[1].duration.as_deref(), Some("7h"));
        assert_eq!(detail.duration_in_minutes, 585 + 420);

        let first = &detail.itineraries[0].segments[0];
        assert_eq!(first.departure.location.as_ref().unwrap().city, "Lagos");
        assert_eq!(first.departure.terminal.as_deref(), Some("I"));
        assert_eq!(first.carrier.as_ref().unwrap().name, "Turkish Airlines");
        assert_eq!(
            first.operating.as_ref().unwrap().carrier.as_ref().unwrap().iata_code,
            "TK"
        );
        assert_eq!(first.duration.as_deref(), Some("6h 15m"));
        assert!(detail.itineraries[0].segments[1].operating.is_none());
    }

    #[test]
    fn test_unknown_codes_compose_to_none() {
        let mut offer = provider_offer();
        offer.itineraries[0].segments[0].departure.iata_code = "QQQ".to_string();
        offer.itineraries[0].segments[0].carrier_code = "Q9".to_string();

        let detail = compose_offer(offer, "ref", &catalog()).unwrap();
        let segment = &detail.itineraries[0].segments[0];
        assert!(segment.departure.location.is_none());
        assert!(segment.carrier.is_none());
    }

    #[test]
    fn test_decompose_inverts_compose() {
        let original = provider_offer();
        let detail = compose_offer(original.clone(), "ref", &catalog()).unwrap();
        let rebuilt = decompose_offer(&detail).unwrap();

        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_decompose_rejects_unresolved_airport() {
        let mut offer = provider_offer();
        offer.itineraries[1].segments[0].arrival.iata_code = "QQQ".to_string();
        let detail = compose_offer(offer, "ref", &catalog()).unwrap();

        match decompose_offer(&detail) {
            Err(CoreError::BadRequest(msg)) => assert!(msg.contains("Segment 3")),
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_provider_duration_fails_compose() {
        let mut offer = provider_offer();
        offer.itineraries[0].duration = Some("nine hours".to_string());
        assert!(compose_offer(offer, "ref", &catalog()).is_err());
    }
}
