//! File System Implementations
//!
//! Concrete implementations of the FileSystem port.

mod home;
mod local;

pub use home::{deployer_config_dir, user_properties_path, CONFIG_DIR_VAR};
pub use local::LocalFs;
