/// Readings are keyed by a local-time text timestamp with microsecond
/// precision. Lexicographic order of this format matches chronological order,
/// which is what `ORDER BY timestamp DESC` relies on.
pub type ReadingTimestamp = String;

/// `strftime` pattern for [`ReadingTimestamp`] values.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
