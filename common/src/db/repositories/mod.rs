// Repository layer for database operations

pub mod property;
pub mod property_query;
pub mod queries;
pub mod reservation;
pub mod user;

pub use property::PropertyRepository;
pub use property_query::{PropertyFilter, PropertyQuery};
pub use reservation::ReservationRepository;
pub use user::UserRepository;
