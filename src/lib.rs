pub mod archive;
pub mod asset;
pub mod download;
pub mod error;
pub mod github;
pub mod http;
pub mod install;
pub mod launch;
pub mod locate;
pub mod paths;
pub mod platform;
pub mod runtime;

/// Prefix for every line the executables print for the user.
pub const LOG_TAG: &str = "[metasweep]";
