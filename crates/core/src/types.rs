/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Quota accounting runs on server-side calendar days.
pub type CalendarDay = chrono::NaiveDate;
