use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default row cap for listing queries
pub const DEFAULT_LIMIT: i64 = 10;

// ============================================================================
// User Models
// ============================================================================

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Opaque password hash, never serialized back out
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Input for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Emails are matched case-insensitively by storing and querying them lowercased
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

// ============================================================================
// Property Models
// ============================================================================

/// A rental property as stored in the `properties` table
///
/// `cost_per_night` is in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

/// Input for creating a property
///
/// `cost_per_night` is in cents, the stored unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// A property together with its average review rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    /// `None` when the property has no reviews
    pub average_rating: Option<f64>,
}

/// Search options for property listings
///
/// Prices are in dollars and get converted to cents
/// before they reach the database. Zero or empty values count as unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertySearch {
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
    pub minimum_rating: Option<f64>,
}

impl PropertySearch {
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|city| !city.is_empty())
    }

    pub fn owner_id(&self) -> Option<i32> {
        self.owner_id.filter(|id| *id != 0)
    }

    /// Minimum price in cents, rounded up so `cost >= min` keeps its meaning
    /// against whole-cent costs
    pub fn minimum_price_cents(&self) -> Option<i64> {
        self.minimum_price_per_night
            .filter(|v| is_set(*v))
            .map(|dollars| dollars_to_cents(dollars, f64::ceil))
    }

    /// Maximum price in cents, rounded down
    pub fn maximum_price_cents(&self) -> Option<i64> {
        self.maximum_price_per_night
            .filter(|v| is_set(*v))
            .map(|dollars| dollars_to_cents(dollars, f64::floor))
    }

    pub fn minimum_rating(&self) -> Option<f64> {
        self.minimum_rating.filter(|v| is_set(*v))
    }
}

fn is_set(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

/// Convert a dollar amount to cents
///
/// Amounts already on a whole cent convert exactly. Anything between two
/// cents goes through `direction` (`f64::ceil` or `f64::floor`).
pub fn dollars_to_cents(dollars: f64, direction: fn(f64) -> f64) -> i64 {
    let cents = dollars * 100.0;
    let nearest = cents.round();
    if (cents - nearest).abs() < CENT_TOLERANCE {
        nearest as i64
    } else {
        direction(cents) as i64
    }
}

// Binary float error on a whole-cent amount, e.g. 0.29 * 100.0
const CENT_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Reservation Models
// ============================================================================

/// A guest's reservation joined with the reserved property and its rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReservationListing {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub average_rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases() {
        assert_eq!(normalize_email("Tristan@Example.COM"), "tristan@example.com");
    }

    #[test]
    fn test_whole_cent_amounts_convert_exactly() {
        assert_eq!(dollars_to_cents(50.0, f64::ceil), 5000);
        assert_eq!(dollars_to_cents(49.99, f64::floor), 4999);
        assert_eq!(dollars_to_cents(49.99, f64::ceil), 4999);
        assert_eq!(dollars_to_cents(0.29, f64::floor), 29);
    }

    #[test]
    fn test_fractional_cent_bounds_round_inward() {
        let search = PropertySearch {
            minimum_price_per_night: Some(49.994),
            maximum_price_per_night: Some(100.006),
            ..Default::default()
        };

        // cost >= 4999.4 admits 5000 but not 4999
        assert_eq!(search.minimum_price_cents(), Some(5000));
        // cost <= 10000.6 admits 10000 but not 10001
        assert_eq!(search.maximum_price_cents(), Some(10000));
    }

    #[test]
    fn test_fractional_cent_minimum_is_not_rounded_down() {
        let search = PropertySearch {
            minimum_price_per_night: Some(49.996),
            maximum_price_per_night: Some(49.996),
            ..Default::default()
        };

        assert_eq!(search.minimum_price_cents(), Some(5000));
        assert_eq!(search.maximum_price_cents(), Some(4999));
    }

    #[test]
    fn test_zero_and_empty_filters_are_unset() {
        let search = PropertySearch {
            city: Some(String::new()),
            owner_id: Some(0),
            minimum_price_per_night: Some(0.0),
            maximum_price_per_night: Some(f64::NAN),
            minimum_rating: Some(0.0),
        };

        assert!(search.city().is_none());
        assert!(search.owner_id().is_none());
        assert!(search.minimum_price_cents().is_none());
        assert!(search.maximum_price_cents().is_none());
        assert!(search.minimum_rating().is_none());
    }

    #[test]
    fn test_price_bounds_convert_to_cents() {
        let search = PropertySearch {
            minimum_price_per_night: Some(50.0),
            maximum_price_per_night: Some(100.0),
            ..Default::default()
        };

        assert_eq!(search.minimum_price_cents(), Some(5000));
        assert_eq!(search.maximum_price_cents(), Some(10000));
    }

    #[test]
    fn test_user_password_not_serialized() {
        let user = User {
            id: 1,
            name: "Devin Sanders".to_string(),
            email: "sebastianguerra@ymail.com".to_string(),
            password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "sebastianguerra@ymail.com");
    }
}
