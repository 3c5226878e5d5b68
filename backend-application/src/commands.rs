pub mod item_commands;
pub mod movement_request_commands;
pub mod user_commands;
