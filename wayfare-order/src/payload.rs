use wayfare_core::booking::{BookingDetails, Customer};
use wayfare_core::gds::{
    ContactInfo, FlightOffer, FlightOrderData, FlightOrderRequest, GeneralRemark, OrderTraveler,
    PersonName, Phone, Remarks, TicketingAgreement, TravelerContactInfo,
};

pub const ORDER_TYPE: &str = "flight-order";
pub const REMARK_SUBTYPE: &str = "GENERAL_MISCELLANEOUS";
pub const TICKETING_OPTION: &str = "DELAY_TO_CANCEL";
pub const TICKETING_DELAY: &str = "1D";
pub const PHONE_DEVICE: &str = "MOBILE";

/// The agency placing orders: its contact block and the remark text.
#[derive(Debug, Clone, PartialEq)]
pub struct AgencyProfile {
    pub contact: ContactInfo,
    pub remark: String,
}

impl AgencyProfile {
    pub fn new(contact: ContactInfo, remark: impl Into<String>) -> Self {
        Self {
            contact,
            remark: remark.into(),
        }
    }
}

fn traveler_contact(customer: &Customer) -> TravelerContactInfo {
    TravelerContactInfo {
        email_address: customer.email.expose().clone(),
        phones: vec![Phone {
            device_type: PHONE_DEVICE.to_string(),
            country_calling_code: customer.country_dialing_code.clone(),
            number: customer.phone.expose().clone(),
        }],
    }
}

/// Order for the stored offer on behalf of every traveler on the booking.
/// All travelers share the booking customer's contact details.
pub fn build_order(
    offer: FlightOffer,
    details: &BookingDetails,
    agency: &AgencyProfile,
) -> FlightOrderRequest {
    let travelers = details
        .travelers
        .iter()
        .map(|t| OrderTraveler {
            id: t.traveler_id.clone(),
            date_of_birth: t.date_of_birth.format("%Y-%m-%d").to_string(),
            name: PersonName {
                first_name: t.first_name.clone(),
                last_name: t.last_name.clone(),
            },
            gender: t.gender.to_uppercase(),
            contact: traveler_contact(&details.customer),
        })
        .collect();

    FlightOrderRequest {
        data: FlightOrderData {
            order_type: ORDER_TYPE.to_string(),
            flight_offers: vec![offer],
            travelers,
            remarks: Remarks {
                general: vec![GeneralRemark {
                    sub_type: REMARK_SUBTYPE.to_string(),
                    text: agency.remark.clone(),
                }],
            },
            ticketing_agreement: TicketingAgreement {
                option: TICKETING_OPTION.to_string(),
                delay: TICKETING_DELAY.to_string(),
            },
            contacts: vec![agency.contact.clone()],
        },
    }
}
