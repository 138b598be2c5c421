//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system and user config directory
//! - `archive/` - Archive sources and the jar assembler
//! - `properties/` - Override sources (command line, environment, user file)
//! - `runtime/` - Control plane over local runtime homes
//! - `events/` - Console and NDJSON event sinks

pub mod archive;
pub mod events;
pub mod fs;
pub mod properties;
pub mod runtime;

// Re-export for convenience
pub use archive::{ArchiveSources, ArtifactAssembler, PackagedArchive};
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::LocalFs;
pub use properties::{EnvPropertySource, FilePropertySource, LayeredPropertySource, MapPropertySource};
pub use runtime::MuleHomeRuntime;
