//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod archive_layout;
mod archive_patterns;
mod config_warning;

pub use archive_layout::{ArchiveLayout, ArchiveRoot};
pub use archive_patterns::{ArchivePatterns, DEFAULT_EXCLUDES};
pub use config_warning::ConfigWarning;
