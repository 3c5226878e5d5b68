// Domain value objects
pub mod action_type;
pub mod date_key;
pub mod identifiers;
pub mod item_kind;
pub mod location;
pub mod role;

pub use action_type::*;
pub use date_key::*;
pub use identifiers::*;
pub use item_kind::*;
pub use location::*;
pub use role::*;
