// Backend Application Layer

pub mod access;
pub mod commands;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod queries;
pub mod state;

pub use error::AppError;
pub use metrics::Metrics;
pub use pipeline::{PipelineRecord, WritePipeline};
pub use state::{AppState, Stores};
