//! HTTP client for the flight provider's self-service APIs.
//!
//! [`GdsClient`] implements [`wayfare_core::provider::FlightProvider`] and
//! reads its bearer token from the credential store on every call.
//! [`TokenService`] is the only writer of that token.

pub mod client;
pub mod config;
pub mod token;

pub use client::GdsClient;
pub use config::GdsConfig;
pub use token::{TokenError, TokenService};
