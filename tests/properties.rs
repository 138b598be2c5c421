//! Property tests for mule-deployer.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "always resolves".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/arguments.rs"]
mod arguments;

#[path = "properties/patterns.rs"]
mod patterns;

#[path = "properties/resolution.rs"]
mod resolution;
