// SQL query constants for repositories
// Centralizes repeated SELECT column lists

/// SQL query fragments for users table
pub mod user_queries {
    /// All columns for users table
    pub const SELECT_ALL_COLUMNS: &str = "id, name, email, password";
}

/// SQL query fragments for properties table
pub mod property_queries {
    /// All columns for properties, qualified so they survive joins
    pub const SELECT_ALL_COLUMNS: &str = r#"properties.id, properties.owner_id, properties.title,
        properties.description, properties.thumbnail_photo_url, properties.cover_photo_url,
        properties.cost_per_night, properties.parking_spaces, properties.number_of_bathrooms,
        properties.number_of_bedrooms, properties.country, properties.street, properties.city,
        properties.province, properties.post_code, properties.active"#;

    /// Average review rating, NULL for properties without reviews
    ///
    /// AVG over SMALLINT yields NUMERIC, cast so it decodes as `f64`.
    pub const AVERAGE_RATING: &str =
        "AVG(property_reviews.rating)::float8 AS average_rating";
}

/// SQL query fragments for reservations joined with properties
pub mod reservation_queries {
    /// Reservation columns followed by the reserved property's columns
    ///
    /// Both tables have an `id`; the property's is exposed as `property_id`.
    pub const SELECT_LISTING_COLUMNS: &str = r#"reservations.id, reservations.guest_id,
        reservations.property_id, reservations.start_date, reservations.end_date,
        properties.owner_id, properties.title, properties.description,
        properties.thumbnail_photo_url, properties.cover_photo_url, properties.cost_per_night,
        properties.parking_spaces, properties.number_of_bathrooms,
        properties.number_of_bedrooms, properties.country, properties.street, properties.city,
        properties.province, properties.post_code"#;
}
