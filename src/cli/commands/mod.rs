//! CLI command implementations
//!
//! Every command returns the process exit code:
//! 0 success, 2 configuration or input error, 3 interrupted,
//! 4 provider setup error, 5 fatal error.

pub mod init;
pub mod run;
pub mod status;
pub mod validate;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 3;
pub const EXIT_PROVIDER_ERROR: i32 = 4;
pub const EXIT_FATAL: i32 = 5;
