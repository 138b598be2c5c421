//! Local runtime adapter
//!
//! - `mule_home` - `ControlPlane` over runtime homes on disk (`MuleHomeRuntime`)
//! - `launcher` - Runs the runtime's launcher script (`Launcher`)

mod launcher;
mod mule_home;

pub use launcher::Launcher;
pub use mule_home::MuleHomeRuntime;
