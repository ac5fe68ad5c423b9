// Reservation repository implementation

use super::queries::{property_queries, reservation_queries};
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::ReservationListing;
use tracing::instrument;

/// Repository for reservation queries
#[derive(Clone)]
pub struct ReservationRepository {
    pool: DbPool,
}

impl ReservationRepository {
    /// Create a new ReservationRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List a guest's reservations with property details and average rating
    ///
    /// Ordered by start date, earliest first. A guest without reservations
    /// gets an empty list.
    #[instrument(skip(self))]
    pub async fn find_by_guest(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationListing>, DatabaseError> {
        let reservations = sqlx::query_as::<_, ReservationListing>(&format!(
            r#"
            SELECT {}, {}
            FROM reservations
            JOIN properties ON reservations.property_id = properties.id
            LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
            WHERE reservations.guest_id = $1
            GROUP BY properties.id, reservations.id
            ORDER BY reservations.start_date
            LIMIT $2
            "#,
            reservation_queries::SELECT_LISTING_COLUMNS,
            property_queries::AVERAGE_RATING
        ))
        .bind(guest_id)
        .bind(limit)
        .fetch_all(self.pool.pool())
        .await?;

        tracing::debug!(
            guest_id,
            count = reservations.len(),
            "Found reservations for guest"
        );
        Ok(reservations)
    }
}
