// Domain entities and read models

pub mod activity;
pub mod analytics;
pub mod config;
pub mod event;
pub mod item;
pub mod movement_request;
pub mod usage;
pub mod user;

pub use activity::*;
pub use analytics::*;
pub use config::*;
pub use event::*;
pub use item::*;
pub use movement_request::*;
pub use usage::*;
pub use user::*;
