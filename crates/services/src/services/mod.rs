pub mod change_events;
pub mod config;
pub mod directory;
pub mod push;
