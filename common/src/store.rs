// Rental store: the data-access surface used by the web application

use crate::db::repositories::{PropertyRepository, ReservationRepository, UserRepository};
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{
    NewProperty, NewUser, Property, PropertyListing, PropertySearch, ReservationListing, User,
};
use crate::telemetry;
use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;

/// Data-access operations for users, properties and reservations
///
/// Lookups return `Ok(None)` when nothing matches; `Err` always means the
/// operation itself failed.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Find a user by email, ignoring case
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Find a user by id
    async fn get_user_with_id(&self, id: i32) -> Result<Option<User>, DatabaseError>;

    /// Insert a user, returning it with its generated id
    async fn add_user(&self, user: &NewUser) -> Result<User, DatabaseError>;

    /// A guest's reservations, earliest start date first, at most `limit`
    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationListing>, DatabaseError>;

    /// Properties matching `search`, cheapest first, at most `limit`
    async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, DatabaseError>;

    /// Insert a property, returning it with its generated id
    async fn add_property(&self, property: &NewProperty) -> Result<Property, DatabaseError>;
}

/// PostgreSQL-backed rental store
#[derive(Clone)]
pub struct PgRentalStore {
    users: UserRepository,
    properties: PropertyRepository,
    reservations: ReservationRepository,
}

impl PgRentalStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            properties: PropertyRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }
}

/// Run one store operation, recording metrics and logging failures
async fn observe<T, F>(operation: &'static str, fut: F) -> Result<T, DatabaseError>
where
    F: Future<Output = Result<T, DatabaseError>>,
{
    let started = Instant::now();
    let result = fut.await;
    let elapsed = started.elapsed().as_secs_f64();

    match &result {
        Ok(_) => telemetry::record_query(operation, elapsed),
        Err(e) => {
            tracing::error!(
                operation,
                error = %e,
                error_kind = e.kind(),
                "Store operation failed"
            );
            telemetry::record_query_failure(operation, e.kind(), elapsed);
        }
    }

    result
}

#[async_trait]
impl RentalStore for PgRentalStore {
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        observe("get_user_with_email", self.users.find_by_email(email)).await
    }

    async fn get_user_with_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        observe("get_user_with_id", self.users.find_by_id(id)).await
    }

    async fn add_user(&self, user: &NewUser) -> Result<User, DatabaseError> {
        observe("add_user", self.users.create(user)).await
    }

    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationListing>, DatabaseError> {
        observe(
            "get_all_reservations",
            self.reservations.find_by_guest(guest_id, limit),
        )
        .await
    }

    async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, DatabaseError> {
        observe(
            "get_all_properties",
            self.properties.find_with_search(search, limit),
        )
        .await
    }

    async fn add_property(&self, property: &NewProperty) -> Result<Property, DatabaseError> {
        observe("add_property", self.properties.create(property)).await
    }
}
