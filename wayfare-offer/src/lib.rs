pub mod composer;
pub mod duration;
pub mod expiry;
pub mod itinerary;
pub mod models;
pub mod shopping;

pub use expiry::OfferExpiryPolicy;
pub use models::{FlightOfferDetail, FlightOffersResult, PersistedRequest};
pub use shopping::ShoppingService;
