//! Lifecycle Client
//!
//! Talks to a [`ControlPlane`]: resolves symbolic environment and target names,
//! submits and removes artifacts, and polls until the application reaches the
//! state the action asked for.
//! Inventory is fetched fresh on every lookup and never cached.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::entities::{
    ApplicationId, DeploymentStatus, EnvironmentDescriptor, TargetDescriptor,
};
use crate::domain::ports::{
    ControlPlane, DeployEvent, DeployEventSink, DeploymentParams, NoopEventSink,
};
use crate::error::{DeployError, DeployResult, LookupKind};

use super::retry::{transport_error, RetryPolicy};

/// An accepted submission and the instant the polling budget starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub application: String,
    pub id: ApplicationId,
    pub submitted_at: Instant,
}

impl Submission {
    /// Submission whose polling budget starts now
    pub fn now(application: impl Into<String>, id: ApplicationId) -> Self {
        Self {
            application: application.into(),
            id,
            submitted_at: Instant::now(),
        }
    }
}

/// Timeout and cadence of status polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollSettings {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Remote lifecycle operations over a control plane
pub struct LifecycleClient<C: ControlPlane> {
    plane: C,
    retry: RetryPolicy,
    events: Arc<dyn DeployEventSink>,
}

impl<C: ControlPlane> LifecycleClient<C> {
    pub fn new(plane: C) -> Self {
        Self {
            plane,
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

    pub fn plane(&self) -> &C {
        &self.plane
    }

    /// First environment whose name matches exactly (case-sensitive)
    pub fn find_environment_by_name(
        &self,
        business_group: &str,
        name: &str,
    ) -> DeployResult<EnvironmentDescriptor> {
        let environments = self
            .retry
            .run("list-environments", || self.plane.list_environments(business_group))?;

        let found = environments
            .into_iter()
            .find(|env| env.name == name)
            .ok_or_else(|| DeployError::NotFound {
                kind: LookupKind::Environment,
                name: name.to_string(),
            })?;

        debug!(name, id = %found.id, "resolved environment");
        self.events.on_event(DeployEvent::NameResolved {
            scope: "environment",
            name: found.name.clone(),
            id: found.id.clone(),
        });
        Ok(found)
    }

    /// First target of `environment` whose name matches exactly
    pub fn find_server_by_name(
        &self,
        environment: &EnvironmentDescriptor,
        name: &str,
    ) -> DeployResult<TargetDescriptor> {
        let targets = self
            .retry
            .run("list-targets", || self.plane.list_targets(&environment.id))?;

        let found = targets
            .into_iter()
            .find(|target| target.name == name)
            .ok_or_else(|| DeployError::NotFound {
                kind: LookupKind::Target,
                name: name.to_string(),
            })?;

        debug!(name, id = %found.id, environment = %environment.name, "resolved target");
        self.events.on_event(DeployEvent::NameResolved {
            scope: "target",
            name: found.name.clone(),
            id: found.id.clone(),
        });
        Ok(found)
    }

    /// Identifier of the deployed application named in `params`, if any
    pub fn find_application(&self, params: &DeploymentParams) -> DeployResult<Option<ApplicationId>> {
        self.retry
            .run("find-application", || self.plane.find_application(params))
    }

    /// Upload an artifact; acceptance does not mean the application started
    ///
    /// Submissions are not retried: a lost response may still have deployed.
    pub fn deploy(&self, archive: &Path, params: &DeploymentParams) -> DeployResult<Submission> {
        let id = self
            .plane
            .submit_deployment(archive, params)
            .map_err(|err| transport_error("submit-deployment", 1, &err))?;
        Ok(self.submitted(params, id))
    }

    /// Replace the artifact of an already-deployed application
    pub fn update(
        &self,
        id: &ApplicationId,
        archive: &Path,
        params: &DeploymentParams,
    ) -> DeployResult<Submission> {
        let id = self
            .plane
            .update_deployment(id, archive, params)
            .map_err(|err| transport_error("update-deployment", 1, &err))?;
        Ok(self.submitted(params, id))
    }

    fn submitted(&self, params: &DeploymentParams, id: ApplicationId) -> Submission {
        info!(application = %params.application_name, %id, "deployment accepted");
        self.events.on_event(DeployEvent::Submitted {
            application: params.application_name.clone(),
            id: id.to_string(),
        });
        Submission::now(params.application_name.clone(), id)
    }

    /// Ask the target to remove an application
    ///
    /// Acceptance does not mean the application stopped; the returned
    /// submission starts the budget for [`poll_until_stopped`](Self::poll_until_stopped).
    pub fn undeploy(&self, application: &str, id: &ApplicationId) -> DeployResult<Submission> {
        self.plane
            .undeploy(id)
            .map_err(|err| transport_error("undeploy", 1, &err))?;
        info!(application, %id, "undeploy accepted");
        Ok(Submission::now(application, id.clone()))
    }

    /// Single status check with no retry
    pub fn is_started(&self, id: &ApplicationId) -> DeployResult<bool> {
        self.plane
            .get_status(id)
            .map(|status| status == DeploymentStatus::Started)
            .map_err(|err| transport_error("get-status", 1, &err))
    }

    /// Poll until the application is started
    ///
    /// The budget runs from `submission.submitted_at`. `Failed` ends polling
    /// at once. Returns the number of polls it took.
    pub fn poll_until_started(
        &self,
        submission: &Submission,
        poll: PollSettings,
    ) -> DeployResult<u32> {
        self.poll_status(submission, poll, "started", |status| match status {
            DeploymentStatus::Started => Ok(true),
            DeploymentStatus::Failed => Err(DeployError::DeploymentFailed {
                application: submission.application.clone(),
                id: submission.id.to_string(),
            }),
            DeploymentStatus::NotStarted | DeploymentStatus::Unknown => Ok(false),
        })
    }

    /// Poll until the application no longer reports `Started`
    ///
    /// A `Failed` application is not running, so it counts as stopped.
    pub fn poll_until_stopped(
        &self,
        submission: &Submission,
        poll: PollSettings,
    ) -> DeployResult<u32> {
        let polls = self.poll_status(submission, poll, "stopped", |status| {
            Ok(status != DeploymentStatus::Started)
        })?;
        self.events.on_event(DeployEvent::Undeployed {
            application: submission.application.clone(),
        });
        Ok(polls)
    }

    /// Shared polling loop; `settled` decides when a status ends it
    fn poll_status(
        &self,
        submission: &Submission,
        poll: PollSettings,
        expected: &'static str,
        mut settled: impl FnMut(DeploymentStatus) -> DeployResult<bool>,
    ) -> DeployResult<u32> {
        let deadline = submission.submitted_at + poll.timeout;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let status = self.retry.run_until("get-status", Some(deadline), || {
                self.plane.get_status(&submission.id)
            })?;

            debug!(application = %submission.application, attempt, %status, expected, "polled status");
            if self.events.wants_detailed_events() {
                self.events.on_event(DeployEvent::StatusPolled {
                    application: submission.application.clone(),
                    attempt,
                    status,
                });
            }

            if settled(status)? {
                return Ok(attempt);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(DeployError::DeploymentTimeout {
                    application: submission.application.clone(),
                    expected,
                    timeout: poll.timeout,
                });
            }
            thread::sleep(poll.interval.min(deadline - now));
        }
    }
}
