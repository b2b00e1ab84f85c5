pub mod config;
pub mod room;
pub mod types;
