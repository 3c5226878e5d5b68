pub mod clickhouse_events;
pub mod memory_store;
pub mod snapshot;

pub use clickhouse_events::*;
pub use memory_store::*;
pub use snapshot::*;
