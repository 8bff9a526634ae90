use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_core::booking::TravelerType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeBookingRequest {
    #[serde(rename = "amaClientRef")]
    pub client_ref: String,
    pub traveler_credentials: Vec<TravelerCredentials>,
    pub traveler_contact: TravelerContact,
}

/// One passenger as entered by the shopper. `id` must match a traveler
/// pricing id on the verified offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerCredentials {
    pub id: String,
    #[serde(rename = "type")]
    pub traveler_type: TravelerType,
    #[serde(default)]
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
}

impl TravelerCredentials {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerContact {
    pub email: String,
    pub phone: String,
    pub country_dialing_code: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub flight_booking_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializedBooking {
    pub flight_booking_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initialize_request_wire_names() {
        let request: InitializeBookingRequest = serde_json::from_value(json!({
            "amaClientRef": "c0ffee",
            "travelerCredentials": [{
                "id": "1",
                "type": "HELD_INFANT",
                "firstName": "Tobi",
                "lastName": "Ade",
                "gender": "male",
                "dateOfBirth": "2023-06-01"
            }],
            "travelerContact": {
                "email": "ade@example.com",
                "phone": "8031234567",
                "countryDialingCode": "234",
                "firstName": "Kemi",
                "lastName": "Ade"
            }
        }))
        .unwrap();

        assert_eq!(request.client_ref, "c0ffee");
        let traveler = &request.traveler_credentials[0];
        assert_eq!(traveler.traveler_type, TravelerType::HeldInfant);
        assert_eq!(traveler.title, None);
        assert_eq!(traveler.full_name(), "Tobi Ade");
    }
}
