pub mod common;
pub mod list;
pub mod send;
pub mod ticker;
pub mod watch;
