pub mod auth;
pub mod config;
pub mod diary;
pub mod task;
pub mod timer;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
