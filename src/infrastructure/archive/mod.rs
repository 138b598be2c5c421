//! Archive assembly
//!
//! - `sources` - What goes into an archive (`ArchiveSources`)
//! - `assembler` - Reproducible zip (`.jar`) writer (`ArtifactAssembler`)

mod assembler;
mod sources;

pub use assembler::{ArtifactAssembler, PackagedArchive};
pub use sources::{pom_properties, ArchiveSource, ArchiveSources, SourceContent};
