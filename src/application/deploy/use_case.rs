//! Deployment Driver
//!
//! Runs one lifecycle action end to end:
//! 1. Resolve the request into a complete configuration
//! 2. Validate the project
//! 3. Assemble the archive
//! 4. Resolve symbolic environment and target names (control-plane kinds)
//! 5. Submit, then poll until the application started (deploy) or stopped
//!    (undeploy)
//!
//! Every step is fail-fast. Nothing is rolled back: an archive written in
//! step 3 stays on disk when a later step fails.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{info, info_span};

use crate::application::lifecycle::{LifecycleClient, PollSettings, RetryPolicy};
use crate::domain::entities::{EnvironmentDescriptor, ResolvedDeployment, TargetDescriptor};
use crate::domain::ports::{
    ControlPlane, ControlPlaneProvider, DeployEvent, DeployEventSink, DeploymentParams, FileSystem,
    NoopEventSink, PropertySource,
};
use crate::domain::services::{ConfigResolver, ProjectValidator};
use crate::domain::value_objects::ArchivePatterns;
use crate::error::{ArchiveError, DeployError, DeployResult, LookupKind};
use crate::infrastructure::{ArchiveSources, ArtifactAssembler, PackagedArchive};

use super::options::DeployOptions;
use super::result::{DeployOutcome, LifecycleAction};

type Client = LifecycleClient<Arc<dyn ControlPlane>>;

/// Deployment driver, parameterized by its override source and file system
pub struct DeploymentDriver<P, FS>
where
    P: PropertySource,
    FS: FileSystem,
{
    resolver: ConfigResolver<P>,
    file_system: FS,
    assembler: ArtifactAssembler,
    provider: Arc<dyn ControlPlaneProvider>,
    retry: RetryPolicy,
    events: Arc<dyn DeployEventSink>,
}

impl<P, FS> DeploymentDriver<P, FS>
where
    P: PropertySource,
    FS: FileSystem,
{
    pub fn new(properties: P, file_system: FS, provider: Arc<dyn ControlPlaneProvider>) -> Self {
        Self {
            resolver: ConfigResolver::new(properties),
            file_system,
            assembler: ArtifactAssembler::new(),
            provider,
            retry: RetryPolicy::default(),
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Fill every field of the request
    pub fn resolve(&self, options: &DeployOptions) -> DeployResult<ResolvedDeployment> {
        Ok(self
            .resolver
            .resolve(&options.request, &options.project, &options.project_root)?)
    }

    /// Pre-flight checks on the project layout and dependencies
    pub fn validate(&self, options: &DeployOptions) -> DeployResult<()> {
        let project = &options.project;
        ProjectValidator::new(&self.file_system).validate(
            project,
            project.packaging,
            &options.project_root,
            &project.shared_libraries,
        )?;
        Ok(())
    }

    /// Validate the project and write its archive to the resolved artifact path
    pub fn package(&self, options: &DeployOptions) -> DeployResult<PackagedArchive> {
        let resolved = self.resolve(options)?;
        self.validate(options)?;
        self.assemble(options, &resolved.base().artifact)
    }

    /// Deploy, replacing the artifact if the application already exists
    pub fn deploy(&self, options: &DeployOptions) -> DeployResult<DeployOutcome> {
        let started = Instant::now();
        let (resolved, mut outcome) = self.begin(LifecycleAction::Deploy, options)?;
        if outcome.skipped {
            return Ok(outcome);
        }
        let _span = info_span!("deploy", application = %outcome.application).entered();

        outcome.archive = self.prepare_archive(options, &resolved)?;
        let client = self.client(&resolved)?;
        let params = self.resolve_params(&client, &resolved)?;
        let artifact = &resolved.base().artifact;

        let submission = match client.find_application(&params)? {
            Some(existing) => {
                info!(id = %existing, "application exists, updating");
                client.update(&existing, artifact, &params)?
            }
            None => client.deploy(artifact, &params)?,
        };
        outcome.polls = client.poll_until_started(&submission, poll_settings(&resolved))?;
        outcome.application_id = Some(submission.id);

        Ok(self.completed(outcome, started))
    }

    /// Remove the application from its target
    ///
    /// Undeploying an absent application is a `NotFound` error, except for
    /// control-plane-managed deployments with `fail_if_not_exists = false`.
    pub fn undeploy(&self, options: &DeployOptions) -> DeployResult<DeployOutcome> {
        let started = Instant::now();
        let (resolved, mut outcome) = self.begin(LifecycleAction::Undeploy, options)?;
        if outcome.skipped {
            return Ok(outcome);
        }
        let _span = info_span!("undeploy", application = %outcome.application).entered();

        let client = self.client(&resolved)?;
        let params = self.resolve_params(&client, &resolved)?;

        match client.find_application(&params)? {
            Some(id) => {
                let removal = client.undeploy(&outcome.application, &id)?;
                outcome.polls = client.poll_until_stopped(&removal, poll_settings(&resolved))?;
                outcome.application_id = Some(id);
            }
            None if tolerates_absent(&resolved) => {
                info!("application not deployed, nothing to undeploy");
            }
            None => {
                return Err(DeployError::NotFound {
                    kind: LookupKind::Application,
                    name: outcome.application,
                })
            }
        }

        Ok(self.completed(outcome, started))
    }

    /// Undeploy any existing application, then deploy it fresh
    pub fn redeploy(&self, options: &DeployOptions) -> DeployResult<DeployOutcome> {
        let started = Instant::now();
        let (resolved, mut outcome) = self.begin(LifecycleAction::Redeploy, options)?;
        if outcome.skipped {
            return Ok(outcome);
        }
        let _span = info_span!("redeploy", application = %outcome.application).entered();

        outcome.archive = self.prepare_archive(options, &resolved)?;
        let client = self.client(&resolved)?;
        let params = self.resolve_params(&client, &resolved)?;

        let poll = poll_settings(&resolved);
        if let Some(existing) = client.find_application(&params)? {
            let removal = client.undeploy(&outcome.application, &existing)?;
            client.poll_until_stopped(&removal, poll)?;
        }
        let submission = client.deploy(&resolved.base().artifact, &params)?;
        outcome.polls = client.poll_until_started(&submission, poll)?;
        outcome.application_id = Some(submission.id);

        Ok(self.completed(outcome, started))
    }

    /// Deploy several projects concurrently, one thread per request
    ///
    /// Results come back in input order; one failure does not stop the rest.
    pub fn deploy_all(&self, batch: &[DeployOptions]) -> Vec<DeployResult<DeployOutcome>> {
        thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|options| scope.spawn(move || self.deploy(options)))
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }

    // Pipeline steps

    /// Resolve and announce the action; the outcome is marked skipped when
    /// `mule.skip` is set
    fn begin(
        &self,
        action: LifecycleAction,
        options: &DeployOptions,
    ) -> DeployResult<(ResolvedDeployment, DeployOutcome)> {
        let resolved = self.resolve(options)?;
        let application = resolved.application_name().to_string();
        let mut outcome = DeployOutcome::new(action, application.clone(), resolved.kind());

        self.events.on_event(DeployEvent::Started {
            action: action.as_str(),
            application: application.clone(),
            kind: resolved.kind(),
        });

        if resolved.base().skip {
            info!(%application, action = action.as_str(), "skipping, mule.skip is set");
            self.events.on_event(DeployEvent::Skipped { application });
            outcome.skipped = true;
        }

        Ok((resolved, outcome))
    }

    /// Validate, then either assemble the archive or check the prebuilt one
    fn prepare_archive(
        &self,
        options: &DeployOptions,
        resolved: &ResolvedDeployment,
    ) -> DeployResult<Option<PackagedArchive>> {
        self.validate(options)?;
        self.events.on_event(DeployEvent::Validated {
            application: resolved.application_name().to_string(),
        });

        let artifact = &resolved.base().artifact;
        if options.package {
            return self.assemble(options, artifact).map(Some);
        }

        if !self.file_system.exists(artifact) {
            return Err(ArchiveError::UnreadableSource {
                path: artifact.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "prebuilt artifact does not exist",
                ),
            }
            .into());
        }
        Ok(None)
    }

    fn assemble(&self, options: &DeployOptions, output: &Path) -> DeployResult<PackagedArchive> {
        let patterns = ArchivePatterns::new(&options.includes, &options.excludes)?;
        let sources = ArchiveSources::for_project(&options.project, &options.project_root, patterns);
        let archive = self.assembler.assemble(&sources, output)?;

        info!(path = %archive.path.display(), entries = archive.entries.len(), "archive assembled");
        self.events.on_event(DeployEvent::Assembled {
            path: archive.path.clone(),
            entries: archive.entries.len(),
            sha256: archive.sha256.clone(),
        });
        Ok(archive)
    }

    fn client(&self, resolved: &ResolvedDeployment) -> DeployResult<Client> {
        let plane = self.provider.control_plane(resolved)?;
        Ok(LifecycleClient::new(plane)
            .with_retry(self.retry)
            .with_events(self.events.clone()))
    }

    /// Look up environment and target ids where the kind deploys by name
    fn resolve_params(
        &self,
        client: &Client,
        resolved: &ResolvedDeployment,
    ) -> DeployResult<DeploymentParams> {
        let (environment, target) = match resolved {
            ResolvedDeployment::ControlPlaneManaged(settings) => {
                let environment = client.find_environment_by_name(
                    &settings.platform.business_group,
                    &settings.platform.environment,
                )?;
                let target = client.find_server_by_name(&environment, &settings.target)?;
                (Some(environment), Some(target))
            }
            ResolvedDeployment::PlatformHosted(settings) => {
                let environment = client.find_environment_by_name(
                    &settings.platform.business_group,
                    &settings.platform.environment,
                )?;
                (Some(environment), None)
            }
            ResolvedDeployment::Standalone(_)
            | ResolvedDeployment::Cluster(_)
            | ResolvedDeployment::Agent(_) => (None, None),
        };
        Ok(deployment_params(resolved, environment.as_ref(), target.as_ref()))
    }

    fn completed(&self, mut outcome: DeployOutcome, started: Instant) -> DeployOutcome {
        outcome.elapsed = started.elapsed();
        info!(
            action = outcome.action.as_str(),
            application = %outcome.application,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "lifecycle action completed"
        );
        self.events.on_event(DeployEvent::Completed {
            action: outcome.action.as_str(),
            application: outcome.application.clone(),
            elapsed: outcome.elapsed,
        });
        outcome
    }
}

fn poll_settings(resolved: &ResolvedDeployment) -> PollSettings {
    let base = resolved.base();
    PollSettings::new(base.deployment_timeout(), base.poll_interval())
}

fn tolerates_absent(resolved: &ResolvedDeployment) -> bool {
    match resolved {
        ResolvedDeployment::ControlPlaneManaged(settings) => !settings.fail_if_not_exists,
        _ => false,
    }
}

/// Upload parameters for a resolved deployment
///
/// `environment` and `target` are the looked-up descriptors for kinds that
/// deploy by name; their ids replace the symbolic names.
pub fn deployment_params(
    resolved: &ResolvedDeployment,
    environment: Option<&EnvironmentDescriptor>,
    target: Option<&TargetDescriptor>,
) -> DeploymentParams {
    let base = resolved.base();
    let mut params = DeploymentParams::new(resolved.kind(), base.application_name.clone());
    params.mule_version = base.mule_version.clone();
    params.environment_id = environment.map(|env| env.id.clone());
    params.target_id = target.map(|t| t.id.clone());

    if let Some(platform) = resolved.platform() {
        params.base_uri = Some(platform.uri.clone());
        params.business_group = Some(platform.business_group.clone());
    }

    match resolved {
        ResolvedDeployment::Standalone(s) => {
            params.arguments = s.runtime.arguments.clone();
        }
        ResolvedDeployment::Cluster(s) => {
            params.arguments = s.runtime.arguments.clone();
            params.cluster_size = Some(s.size);
        }
        ResolvedDeployment::Agent(s) => {
            params.arguments = s.runtime.arguments.clone();
            params.base_uri = Some(s.uri.clone());
        }
        ResolvedDeployment::ControlPlaneManaged(s) => {
            params.insecure_tls = s.insecure;
            params.target_type = s.target_type;
        }
        ResolvedDeployment::PlatformHosted(s) => {
            params.workers = Some(s.workers);
            params.worker_type = Some(s.worker_type.clone());
            params.region = Some(s.region.clone());
        }
    }
    params
}
