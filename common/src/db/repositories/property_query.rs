// Property listing query assembled from search options
//
// Filters are collected first as an ordered list, then pushed into a
// `sqlx::QueryBuilder` which numbers each bound value as it is pushed.

use super::queries::property_queries;
use crate::models::PropertySearch;
use sqlx::{Postgres, QueryBuilder};

/// A single listing filter, in the units stored by the database
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyFilter {
    /// Substring match on city, case-sensitive
    CityContains(String),
    OwnerId(i32),
    /// Inclusive cost range in cents
    PriceRange { min: i64, max: i64 },
    MinPrice(i64),
    MaxPrice(i64),
    /// Minimum average review rating, applied to groups
    MinRating(f64),
}

impl PropertyFilter {
    /// Aggregate filters go in HAVING, everything else in WHERE
    pub fn is_aggregate(&self) -> bool {
        matches!(self, PropertyFilter::MinRating(_))
    }

    /// Number of values this filter binds
    pub fn bind_count(&self) -> usize {
        match self {
            PropertyFilter::PriceRange { .. } => 2,
            _ => 1,
        }
    }

    fn push_to(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        match self {
            PropertyFilter::CityContains(city) => {
                builder
                    .push("properties.city LIKE ")
                    .push_bind(format!("%{city}%"));
            }
            PropertyFilter::OwnerId(owner_id) => {
                builder.push("properties.owner_id = ").push_bind(*owner_id);
            }
            PropertyFilter::PriceRange { min, max } => {
                builder
                    .push("(properties.cost_per_night >= ")
                    .push_bind(*min)
                    .push(" AND properties.cost_per_night <= ")
                    .push_bind(*max)
                    .push(")");
            }
            PropertyFilter::MinPrice(min) => {
                builder
                    .push("properties.cost_per_night >= ")
                    .push_bind(*min);
            }
            PropertyFilter::MaxPrice(max) => {
                builder
                    .push("properties.cost_per_night <= ")
                    .push_bind(*max);
            }
            PropertyFilter::MinRating(rating) => {
                builder
                    .push("AVG(property_reviews.rating) >= ")
                    .push_bind(*rating);
            }
        }
    }
}

/// Property listing query: ordered filters plus a row limit
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    filters: Vec<PropertyFilter>,
    limit: i64,
}

impl PropertyQuery {
    pub fn new(limit: i64) -> Self {
        Self {
            filters: Vec::new(),
            limit,
        }
    }

    /// Build the query for a search; unset options add no filter
    pub fn from_search(search: &PropertySearch, limit: i64) -> Self {
        let mut query = Self::new(limit);

        if let Some(city) = search.city() {
            query
                .filters
                .push(PropertyFilter::CityContains(city.to_string()));
        }

        if let Some(owner_id) = search.owner_id() {
            query.filters.push(PropertyFilter::OwnerId(owner_id));
        }

        match (search.minimum_price_cents(), search.maximum_price_cents()) {
            (Some(min), Some(max)) => query.filters.push(PropertyFilter::PriceRange { min, max }),
            (Some(min), None) => query.filters.push(PropertyFilter::MinPrice(min)),
            (None, Some(max)) => query.filters.push(PropertyFilter::MaxPrice(max)),
            (None, None) => {}
        }

        if let Some(rating) = search.minimum_rating() {
            query.filters.push(PropertyFilter::MinRating(rating));
        }

        query
    }

    pub fn filters(&self) -> &[PropertyFilter] {
        &self.filters
    }

    /// Total bound values, including the limit
    pub fn bind_count(&self) -> usize {
        self.filters.iter().map(PropertyFilter::bind_count).sum::<usize>() + 1
    }

    /// Push the full statement into a query builder
    pub fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {}, {}\nFROM properties\nLEFT JOIN property_reviews ON properties.id = property_reviews.property_id",
            property_queries::SELECT_ALL_COLUMNS,
            property_queries::AVERAGE_RATING
        ));

        let (having, rows): (Vec<_>, Vec<_>) =
            self.filters.iter().partition(|f| f.is_aggregate());

        for (i, filter) in rows.into_iter().enumerate() {
            builder.push(if i == 0 { "\nWHERE " } else { "\nAND " });
            filter.push_to(&mut builder);
        }

        builder.push("\nGROUP BY properties.id");

        for (i, filter) in having.into_iter().enumerate() {
            builder.push(if i == 0 { "\nHAVING " } else { "\nAND " });
            filter.push_to(&mut builder);
        }

        builder
            .push("\nORDER BY properties.cost_per_night\nLIMIT ")
            .push_bind(self.limit);

        builder
    }
}
