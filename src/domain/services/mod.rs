//! Domain Services
//!
//! Pure business logic over domain entities. The validator reaches the disk
//! only through the `FileSystem` port.

mod config_resolver;
mod project_validator;

pub use config_resolver::{
    split_arguments, ConfigResolver, DEFAULT_CLUSTER_SIZE, DEFAULT_DEPLOYMENT_TIMEOUT_MS,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_REGION, DEFAULT_URI, DEFAULT_WORKERS, DEFAULT_WORKER_TYPE,
};
pub use project_validator::{
    check_domain_references, check_shared_libraries, ProjectValidator, MAX_DOMAIN_REFERENCES,
};
