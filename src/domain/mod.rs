//! Domain Layer
//!
//! Deployment rules without I/O: request and resolved-settings models, the
//! defaulting cascade, pre-flight validation and the ports the application
//! layer drives.
//!
//! ## Structure
//!
//! - `entities/` - Requests, resolved settings, project model, inventory
//! - `value_objects/` - Archive layout and patterns, config warnings
//! - `services/` - ConfigResolver, ProjectValidator
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
