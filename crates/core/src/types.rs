/// Primary keys of the `renders` table (SQLite `INTEGER PRIMARY KEY`).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
