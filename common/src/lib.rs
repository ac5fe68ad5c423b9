// Data-access layer for the LightBnB rental listing application

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;
pub mod telemetry;

pub use errors::DatabaseError;
pub use store::{PgRentalStore, RentalStore};
