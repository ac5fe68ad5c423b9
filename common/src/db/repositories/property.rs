// Property repository implementation

use super::property_query::PropertyQuery;
use super::queries::property_queries;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{NewProperty, Property, PropertyListing, PropertySearch};
use tracing::instrument;

/// Repository for property listings and property creation
#[derive(Clone)]
pub struct PropertyRepository {
    pool: DbPool,
}

impl PropertyRepository {
    /// Create a new PropertyRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a property and return the stored row
    ///
    /// Values are written as given; column constraints are the only
    /// validation.
    #[instrument(skip(self, property), fields(owner_id = property.owner_id))]
    pub async fn create(&self, property: &NewProperty) -> Result<Property, DatabaseError> {
        let created = sqlx::query_as::<_, Property>(&format!(
            r#"
            INSERT INTO properties (
                owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                cost_per_night, street, city, province, post_code, country,
                parking_spaces, number_of_bathrooms, number_of_bedrooms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            property_queries::SELECT_ALL_COLUMNS
        ))
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .bind(&property.country)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .fetch_one(self.pool.pool())
        .await?;

        tracing::info!(property_id = created.id, title = %created.title, "Property created");
        Ok(created)
    }

    /// List properties matching a search, cheapest first
    #[instrument(skip(self))]
    pub async fn find_with_search(
        &self,
        search: &PropertySearch,
        limit: i64,
    ) -> Result<Vec<PropertyListing>, DatabaseError> {
        let query = PropertyQuery::from_search(search, limit);
        let mut builder = query.build();
        tracing::debug!(
            sql = builder.sql(),
            bind_count = query.bind_count(),
            "Built property listing query"
        );

        let listings = builder
            .build_query_as::<PropertyListing>()
            .fetch_all(self.pool.pool())
            .await?;

        tracing::debug!(count = listings.len(), "Found properties with search");
        Ok(listings)
    }

    /// Titles of up to `limit` properties
    #[instrument(skip(self))]
    pub async fn sample_titles(&self, limit: i64) -> Result<Vec<String>, DatabaseError> {
        let titles = sqlx::query_scalar::<_, String>("SELECT title FROM properties LIMIT $1")
            .bind(limit)
            .fetch_all(self.pool.pool())
            .await?;

        Ok(titles)
    }
}
