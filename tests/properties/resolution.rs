//! Property tests for the defaulting cascade.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use mule_deployer::domain::entities::{
    BaseRequest, DeploymentRequest, PlatformHostedRequest, ProjectModel, ResolvedDeployment,
    RuntimeRequest,
};
use mule_deployer::domain::ports::NoProperties;
use mule_deployer::domain::services::{
    ConfigResolver, DEFAULT_DEPLOYMENT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WORKERS,
};
use mule_deployer::infrastructure::MapPropertySource;

fn base_request() -> impl Strategy<Value = BaseRequest> {
    (
        proptest::option::of("[a-z][a-z0-9-]{0,16}"),
        proptest::option::of(1u64..1_000_000),
        proptest::option::of(1u64..10_000),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(application_name, deployment_timeout, poll_interval, skip)| BaseRequest {
            application_name,
            skip,
            deployment_timeout,
            poll_interval,
            ..BaseRequest::default()
        })
}

fn project() -> ProjectModel {
    ProjectModel::new("org.example", "hello", "1.0.0")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A standalone request with a runtime home always resolves,
    /// and every unset field takes its documented default.
    #[test]
    fn property_standalone_resolution_is_total(base in base_request()) {
        let request = DeploymentRequest::Standalone(RuntimeRequest {
            base: base.clone(),
            mule_home: Some(PathBuf::from("/opt/mule")),
            ..RuntimeRequest::default()
        });

        let resolved = ConfigResolver::new(NoProperties)
            .resolve(&request, &project(), Path::new("/work"))
            .unwrap();
        let settings = resolved.base();

        prop_assert_eq!(
            settings.application_name.as_str(),
            base.application_name.as_deref().unwrap_or("hello")
        );
        prop_assert_eq!(
            settings.deployment_timeout_ms,
            base.deployment_timeout.unwrap_or(DEFAULT_DEPLOYMENT_TIMEOUT_MS)
        );
        prop_assert_eq!(
            settings.poll_interval_ms,
            base.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL_MS)
        );
        prop_assert_eq!(settings.skip, base.skip.unwrap_or(false));
        prop_assert!(matches!(resolved, ResolvedDeployment::Standalone(_)));
    }

    /// PROPERTY: Explicit request values win over any override.
    #[test]
    fn property_explicit_values_beat_overrides(
        name in "[a-z][a-z0-9-]{0,16}",
        override_name in "[a-z][a-z0-9-]{0,16}"
    ) {
        let request = DeploymentRequest::Standalone(RuntimeRequest {
            base: BaseRequest {
                application_name: Some(name.clone()),
                ..BaseRequest::default()
            },
            mule_home: Some(PathBuf::from("/opt/mule")),
            ..RuntimeRequest::default()
        });
        let overrides = MapPropertySource::new().with("applicationName", override_name);

        let resolved = ConfigResolver::new(overrides)
            .resolve(&request, &project(), Path::new("/work"))
            .unwrap();

        prop_assert_eq!(resolved.base().application_name.as_str(), name.as_str());
    }

    /// PROPERTY: Platform-hosted worker count is always at least one.
    #[test]
    fn property_platform_hosted_has_workers(workers in proptest::option::of(1u32..16)) {
        let mut request = PlatformHostedRequest {
            workers,
            ..PlatformHostedRequest::default()
        };
        request.platform.environment = Some("Sandbox".into());

        let resolved = ConfigResolver::new(NoProperties)
            .resolve(
                &DeploymentRequest::PlatformHosted(request),
                &project(),
                Path::new("/work"),
            )
            .unwrap();

        let ResolvedDeployment::PlatformHosted(settings) = resolved else {
            panic!("expected platform-hosted settings");
        };
        prop_assert_eq!(settings.workers, workers.unwrap_or(DEFAULT_WORKERS));
        prop_assert!(settings.workers >= 1);
    }
}
