use wayfare_core::booking::TravelerType;
use wayfare_core::gds::{
    CabinRestriction, ConnectionRestriction, DepartureDateTimeRange, FlightFilters,
    FlightSearchRequest, OriginDestination, SearchCriteria, SearchTraveler,
};
use wayfare_core::search::{Cabin, FlightSearchForm, RouteLeg, RouteModel, TravelerCounts};
use wayfare_core::{CoreError, CoreResult};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const MAX_FLIGHT_OFFERS: u32 = 250;
pub const MAX_MULTI_CITY_LEGS: usize = 5;
pub const GDS_SOURCE: &str = "GDS";
pub const STANDARD_FARE: &str = "STANDARD";
pub const ALL_SEGMENTS: &str = "ALL_SEGMENTS";

pub const INCOMPLETE_ROUTE: &str = "Please specify all relevant details for your locations and destinations";
pub const TOO_FEW_LEGS: &str =
    "Minimum of two origins and destinations are required for the multi city route model";
pub const NO_ADULT: &str = "At least one adult is required for a trip";
pub const TOO_MANY_INFANTS: &str = "Number of infants cannot be greater than number of adults";
pub const INVALID_CABIN: &str = "You have provided an invalid flight cabin";

/// Validates a search form and builds the provider search request.
///
/// Checks run in order (route completeness, traveler counts, cabin) and the
/// first failure is returned as a `BadRequest`.
pub fn compose(form: &FlightSearchForm) -> CoreResult<FlightSearchRequest> {
    let legs = route_legs(form)?;
    validate_counts(&form.travelers)?;
    let cabin: Cabin = form
        .flight_cabin
        .parse()
        .map_err(|_| CoreError::bad_request(INVALID_CABIN))?;

    let origin_destinations: Vec<OriginDestination> = legs
        .iter()
        .enumerate()
        .map(|(index, leg)| OriginDestination {
            id: (index + 1).to_string(),
            origin_location_code: leg.origin_location.trim().to_string(),
            destination_location_code: leg.destination_location.trim().to_string(),
            departure_date_time_range: DepartureDateTimeRange {
                date: leg.departure_date.trim().to_string(),
                time: None,
            },
        })
        .collect();

    let origin_destination_ids = origin_destinations.iter().map(|od| od.id.clone()).collect();

    // Only an absent currency falls back; a supplied one goes through as sent
    let currency_code = form
        .currency_code
        .clone()
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    Ok(FlightSearchRequest {
        currency_code,
        origin_destinations,
        travelers: travelers(&form.travelers),
        sources: vec![GDS_SOURCE.to_string()],
        search_criteria: SearchCriteria {
            max_flight_offers: MAX_FLIGHT_OFFERS,
            flight_filters: FlightFilters {
                cabin_restrictions: vec![CabinRestriction {
                    cabin,
                    coverage: ALL_SEGMENTS.to_string(),
                    origin_destination_ids,
                }],
                connection_restriction: form.direct_flight.then_some(ConnectionRestriction {
                    max_number_of_connections: 0,
                }),
            },
        },
    })
}

fn route_legs(form: &FlightSearchForm) -> CoreResult<Vec<RouteLeg>> {
    match form.route_model {
        RouteModel::OneWay => {
            let leg = form
                .one_way
                .as_ref()
                .filter(|leg| leg.is_complete())
                .ok_or_else(|| CoreError::bad_request(INCOMPLETE_ROUTE))?;
            Ok(vec![leg.clone()])
        }
        RouteModel::RoundTrip => {
            let trip = form
                .round_trip
                .as_ref()
                .filter(|trip| trip.outbound.is_complete() && !trip.return_date.trim().is_empty())
                .ok_or_else(|| CoreError::bad_request(INCOMPLETE_ROUTE))?;

            let inbound = RouteLeg {
                origin_location: trip.outbound.destination_location.clone(),
                destination_location: trip.outbound.origin_location.clone(),
                departure_date: trip.return_date.clone(),
            };
            Ok(vec![trip.outbound.clone(), inbound])
        }
        RouteModel::MultiCity => {
            let legs: Vec<RouteLeg> = form
                .multi_city
                .as_ref()
                .map(|route| {
                    route
                        .legs
                        .iter()
                        .take(MAX_MULTI_CITY_LEGS)
                        .take_while(|leg| leg.is_complete())
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            if legs.len() < 2 {
                return Err(CoreError::bad_request(TOO_FEW_LEGS));
            }
            Ok(legs)
        }
    }
}

fn validate_counts(counts: &TravelerCounts) -> CoreResult<()> {
    if counts.number_of_adults < 1 {
        return Err(CoreError::bad_request(NO_ADULT));
    }
    if counts.number_of_infants > counts.number_of_adults {
        return Err(CoreError::bad_request(TOO_MANY_INFANTS));
    }
    Ok(())
}

/// Adults, then children, then held infants, numbered from 1.
fn travelers(counts: &TravelerCounts) -> Vec<SearchTraveler> {
    let mut travelers = Vec::new();
    let mut next_id = 1;

    let mut push = |traveler_type: TravelerType, associated_adult_id: Option<String>| {
        travelers.push(SearchTraveler {
            id: next_id.to_string(),
            associated_adult_id,
            traveler_type,
            fare_options: vec![STANDARD_FARE.to_string()],
        });
        next_id += 1;
    };

    for _ in 0..counts.number_of_adults {
        push(TravelerType::Adult, None);
    }
    for _ in 0..counts.number_of_children {
        push(TravelerType::Child, None);
    }
    // Associated adult id is the infant's own 1-based position among infants.
    for infant in 1..=counts.number_of_infants {
        push(TravelerType::HeldInfant, Some(infant.to_string()));
    }

    travelers
}
