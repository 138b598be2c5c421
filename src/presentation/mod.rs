//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating the driver with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `cli` - Command line definition
//! - `factory` - Creates the driver with proper dependencies (dependency injection)
//! - `output` - Output rendering
//!
//! ## Usage
//!
//! ```ignore
//! use mule_deployer::presentation::factory;
//!
//! let properties = factory::create_property_source(&assignments)?;
//! let driver = factory::create_driver(properties, RuntimeProvider::new(), events);
//! let outcome = driver.deploy(&options)?;
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use factory::{create_driver, RuntimeProvider};
