/// Record identifiers are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Optimistic-concurrency counter stored alongside every record.
pub type Revision = i64;
