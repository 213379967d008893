/// Listings, users and tokens use PostgreSQL BIGSERIAL keys.
pub type DbId = i64;

/// Reference-data rows (makes, models, cities, ...) use PostgreSQL INTEGER keys.
///
/// ID 0 is never assigned to a real row.
pub type RefId = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
