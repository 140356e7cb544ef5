//! Structured logging field name constants for tagfs.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by the same names across subsystems.

/// Subsystem originating the log event.
/// Values: "api", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "tags", "files"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "insert", "search", "replace_parents"
pub const OPERATION: &str = "op";

/// Tag id being operated on.
pub const TAG_ID: &str = "tag_id";

/// File id being operated on.
pub const FILE_ID: &str = "file_id";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";
