//! Deploy Module
//!
//! Drives lifecycle actions for Mule projects.
//!
//! ## Structure
//!
//! - `options` - Input of one action (`DeployOptions`)
//! - `result` - Outcome types (`DeployOutcome`, `LifecycleAction`)
//! - `use_case` - The pipeline itself (`DeploymentDriver`)
//!
//! ## Usage
//!
//! ```ignore
//! use mule_deployer::application::deploy::{DeployOptions, DeploymentDriver};
//!
//! let driver = DeploymentDriver::new(properties, LocalFs::new(), provider);
//! let outcome = driver.deploy(&DeployOptions::new(root, project, request))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployOutcome, LifecycleAction};
pub use use_case::{deployment_params, DeploymentDriver};
