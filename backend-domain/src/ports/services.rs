use chrono::{DateTime, Utc};

/// Source of pipeline timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
