//! Property Source Port
//!
//! The override layer of the defaulting cascade: a key/value lookup with
//! well-known keys. Implementations read command-line properties, environment
//! variables or a user properties file.

/// Well-known override keys
pub mod keys {
    pub const APPLICATION_NAME: &str = "applicationName";
    pub const SKIP: &str = "mule.skip";
    pub const MULE_VERSION: &str = "mule.version";
    pub const APPLICATION: &str = "mule.application";
    pub const SCRIPT: &str = "script";
    pub const TIMEOUT: &str = "mule.timeout";
    pub const DEPLOYMENT_TIMEOUT: &str = "mule.deploymentConfiguration.timeout";
    pub const POLL_INTERVAL: &str = "mule.deploymentConfiguration.pollInterval";
    pub const ARGUMENTS: &str = "mule.arguments";
    pub const MULE_HOME: &str = "mule.home";
    pub const URI: &str = "anypoint.uri";
    pub const BUSINESS_GROUP: &str = "anypoint.businessGroup";
    pub const ENVIRONMENT: &str = "anypoint.environment";
    pub const PASSWORD: &str = "anypoint.password";
    pub const USERNAME: &str = "anypoint.username";
    pub const SERVER: &str = "maven.server";
    pub const ARM_INSECURE: &str = "arm.insecure";
    pub const TARGET: &str = "anypoint.target";
    pub const TARGET_TYPE: &str = "anypoint.target.type";
    pub const WORKERS: &str = "cloudhub.workers";
    pub const WORKER_TYPE: &str = "cloudhub.workerType";
    pub const REGION: &str = "cloudhub.region";
    pub const CLUSTER_SIZE: &str = "mule.cluster.size";
    pub const FAIL_IF_NOT_EXISTS: &str = "arm.failIfNotExists";

    /// Every key the resolver consults
    pub const ALL: &[&str] = &[
        APPLICATION_NAME,
        SKIP,
        MULE_VERSION,
        APPLICATION,
        SCRIPT,
        TIMEOUT,
        DEPLOYMENT_TIMEOUT,
        POLL_INTERVAL,
        ARGUMENTS,
        MULE_HOME,
        URI,
        BUSINESS_GROUP,
        ENVIRONMENT,
        PASSWORD,
        USERNAME,
        SERVER,
        ARM_INSECURE,
        TARGET,
        TARGET_TYPE,
        WORKERS,
        WORKER_TYPE,
        REGION,
        CLUSTER_SIZE,
        FAIL_IF_NOT_EXISTS,
    ];
}

/// Key/value lookup consulted between explicit values and computed defaults
pub trait PropertySource: Send + Sync {
    /// Value for `key`, if this source defines it
    fn get(&self, key: &str) -> Option<String>;
}

/// Source that defines nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProperties;

impl PropertySource for NoProperties {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

impl<T: PropertySource + ?Sized> PropertySource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<T: PropertySource + ?Sized> PropertySource for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}
