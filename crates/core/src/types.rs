/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Zero-based position of a project in the catalog.
pub type ProjectIndex = u32;

/// Zero-based position of a task within a project's task list.
pub type TaskIndex = u32;
