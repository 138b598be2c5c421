//! Lifecycle Module
//!
//! Remote lifecycle operations over a `ControlPlane`.
//!
//! ## Structure
//!
//! - `client` - Name resolution, submission, removal and status polling (`LifecycleClient`)
//! - `retry` - Bounded retry of transient read failures (`RetryPolicy`)
//!
//! ## Usage
//!
//! ```ignore
//! use mule_deployer::application::lifecycle::{LifecycleClient, PollSettings};
//!
//! let client = LifecycleClient::new(plane);
//! let env = client.find_environment_by_name("", "Production")?;
//! let submission = client.deploy(&archive, &params)?;
//! client.poll_until_started(&submission, PollSettings::new(timeout, interval))?;
//! ```

mod client;
mod retry;

pub use client::{LifecycleClient, PollSettings, Submission};
pub use retry::RetryPolicy;

#[cfg(test)]
pub(crate) mod tests;
