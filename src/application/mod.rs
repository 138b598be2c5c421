//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeploymentDriver` - resolve, validate, assemble, submit and poll
//! - `LifecycleClient` - name lookups, submissions and status polling
//!   against a control plane

pub mod deploy;
pub mod lifecycle;

pub use deploy::{DeployOptions, DeployOutcome, DeploymentDriver, LifecycleAction};
pub use lifecycle::{LifecycleClient, PollSettings, RetryPolicy, Submission};
