//! Command handlers: bridge CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod login;
pub mod set_temp;
pub mod status;
pub mod watch;
