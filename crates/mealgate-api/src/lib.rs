// mealgate-api: Async client for the registration backend's form endpoints.

pub mod client;
pub mod error;
pub mod token;
pub mod transport;

pub use client::{CheckinClient, UsedMealsForm};
pub use error::Error;
pub use token::{BearerToken, TokenClaims, ORGANIZER_GROUP};
pub use transport::{TlsMode, TransportConfig};
