pub mod backlog;
pub mod serve;
