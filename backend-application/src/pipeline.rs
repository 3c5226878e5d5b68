// Write pipeline: one movement event fans out into the event log and the
// per-user-per-day materialized views.

pub mod usage_tracking;
pub mod write_pipeline;

pub use usage_tracking::*;
pub use write_pipeline::*;
