pub mod models;
pub mod reference;

pub use models::{Airline, Airport};
pub use reference::{CatalogError, ReferenceCatalog};
