pub mod lifecycle;
pub mod models;
pub mod payload;
pub mod rules;

pub use lifecycle::BookingLifecycle;
pub use models::{CreateBookingRequest, InitializeBookingRequest, InitializedBooking};
pub use payload::AgencyProfile;
