//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod control_plane;
pub mod deploy_events;
pub mod file_system;
pub mod property_source;

pub use control_plane::{
    ControlPlane, ControlPlaneError, ControlPlaneProvider, ControlPlaneResult, DeploymentParams,
};
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use file_system::{FileSystem, FsError, FsResult};
pub use property_source::{keys, NoProperties, PropertySource};
