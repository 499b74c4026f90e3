pub mod config;
pub mod mode;
pub mod scheduler;
pub mod time;
