pub mod backlog;
pub mod config;
pub mod cookies;
pub mod error;
pub mod ids;
pub mod jira;
pub mod size;

pub use error::{Result, WallieError};
