pub mod app_config;
pub mod booking_repo;
pub mod credential_repo;
pub mod database;
pub mod flight_request_repo;
pub mod memory;
pub mod offer_repo;
pub mod redis_repo;

pub use booking_repo::PgBookingRepository;
pub use credential_repo::PgCredentialRepository;
pub use database::DbClient;
pub use flight_request_repo::PgFlightRequestRepository;
pub use memory::InMemoryStore;
pub use offer_repo::PgOfferRepository;
pub use redis_repo::RedisClient;
