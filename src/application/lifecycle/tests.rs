//! Tests for the lifecycle client, plus the scripted control plane shared with
//! the deploy driver tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::*;
use crate::domain::entities::{
    ApplicationId, DeploymentKind, DeploymentStatus, EnvironmentDescriptor, TargetDescriptor,
};
use crate::domain::ports::{
    ControlPlane, ControlPlaneError, ControlPlaneResult, DeployEvent, DeployEventSink,
    DeploymentParams,
};
use crate::error::{DeployError, LookupKind};

/// Control plane that replays scripted answers and records every call
#[derive(Default)]
pub(crate) struct ScriptedPlane {
    pub environments: Vec<EnvironmentDescriptor>,
    pub targets: HashMap<String, Vec<TargetDescriptor>>,
    /// Answers to `get_status`, front first; `fallback_status` once drained
    pub statuses: Mutex<VecDeque<ControlPlaneResult<DeploymentStatus>>>,
    pub fallback_status: Option<DeploymentStatus>,
    /// Transient failures `list_environments` returns before answering
    pub environment_failures: Mutex<u32>,
    pub submit_error: Option<ControlPlaneError>,
    pub deployed: Mutex<HashMap<String, ApplicationId>>,
    pub submitted: Mutex<Vec<(PathBuf, DeploymentParams)>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl ScriptedPlane {
    pub fn with_environments(mut self, environments: &[(&str, &str)]) -> Self {
        self.environments = environments
            .iter()
            .map(|(name, id)| EnvironmentDescriptor::new(*name, *id))
            .collect();
        self
    }

    pub fn with_targets(mut self, environment_id: &str, targets: &[(&str, &str)]) -> Self {
        self.targets.insert(
            environment_id.to_string(),
            targets
                .iter()
                .map(|(name, id)| TargetDescriptor::new(*name, *id))
                .collect(),
        );
        self
    }

    pub fn with_statuses(self, statuses: &[DeploymentStatus]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().copied().map(Ok).collect();
        self
    }

    pub fn with_status_results(
        self,
        results: Vec<ControlPlaneResult<DeploymentStatus>>,
    ) -> Self {
        *self.statuses.lock().unwrap() = results.into();
        self
    }

    pub fn with_fallback_status(mut self, status: DeploymentStatus) -> Self {
        self.fallback_status = Some(status);
        self
    }

    pub fn with_deployed(self, name: &str, id: &str) -> Self {
        self.deployed
            .lock()
            .unwrap()
            .insert(name.to_string(), ApplicationId::new(id));
        self
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ControlPlane for ScriptedPlane {
    fn list_environments(
        &self,
        _business_group: &str,
    ) -> ControlPlaneResult<Vec<EnvironmentDescriptor>> {
        self.record("list-environments");
        let mut failures = self.environment_failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(ControlPlaneError::Transient("connection reset".into()));
        }
        Ok(self.environments.clone())
    }

    fn list_targets(&self, environment_id: &str) -> ControlPlaneResult<Vec<TargetDescriptor>> {
        self.record("list-targets");
        Ok(self.targets.get(environment_id).cloned().unwrap_or_default())
    }

    fn find_application(
        &self,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<Option<ApplicationId>> {
        self.record("find-application");
        Ok(self
            .deployed
            .lock()
            .unwrap()
            .get(&params.application_name)
            .cloned())
    }

    fn submit_deployment(
        &self,
        artifact: &Path,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<ApplicationId> {
        self.record("submit");
        if let Some(err) = &self.submit_error {
            return Err(err.clone());
        }
        let id = ApplicationId::new(format!("id-{}", params.application_name));
        self.submitted
            .lock()
            .unwrap()
            .push((artifact.to_path_buf(), params.clone()));
        self.deployed
            .lock()
            .unwrap()
            .insert(params.application_name.clone(), id.clone());
        Ok(id)
    }

    fn update_deployment(
        &self,
        id: &ApplicationId,
        artifact: &Path,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<ApplicationId> {
        self.record("update");
        self.submitted
            .lock()
            .unwrap()
            .push((artifact.to_path_buf(), params.clone()));
        Ok(id.clone())
    }

    fn undeploy(&self, id: &ApplicationId) -> ControlPlaneResult<()> {
        self.record("undeploy");
        self.deployed.lock().unwrap().retain(|_, v| v != id);
        Ok(())
    }

    fn get_status(&self, _id: &ApplicationId) -> ControlPlaneResult<DeploymentStatus> {
        self.record("get-status");
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.fallback_status.unwrap_or(DeploymentStatus::NotStarted)))
    }
}

#[derive(Default)]
pub(crate) struct RecordingEventSink {
    pub events: Mutex<Vec<DeployEvent>>,
}

impl DeployEventSink for RecordingEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}

const INTERVAL: Duration = Duration::from_millis(10);

fn client(plane: ScriptedPlane) -> LifecycleClient<ScriptedPlane> {
    LifecycleClient::new(plane).with_retry(RetryPolicy::default().with_delay(Duration::ZERO))
}

fn submission() -> Submission {
    Submission::now("hello", ApplicationId::new("id-hello"))
}

// === Name resolution ===

#[test]
fn find_environment_by_exact_name() {
    let client = client(ScriptedPlane::default().with_environments(&[("Production", "1")]));

    let env = client.find_environment_by_name("", "Production").unwrap();
    assert_eq!(env, EnvironmentDescriptor::new("Production", "1"));
}

#[test]
fn unknown_environment_is_not_found() {
    let client = client(ScriptedPlane::default().with_environments(&[("Production", "1")]));

    let err = client
        .find_environment_by_name("", "notProduction")
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::NotFound { kind: LookupKind::Environment, ref name } if name == "notProduction"
    ));
}

#[test]
fn environment_match_is_case_sensitive() {
    let client = client(ScriptedPlane::default().with_environments(&[("Production", "1")]));
    assert!(client.find_environment_by_name("", "production").is_err());
}

#[test]
fn first_matching_environment_wins() {
    let client = client(
        ScriptedPlane::default().with_environments(&[("Sandbox", "0"), ("Dup", "1"), ("Dup", "2")]),
    );
    assert_eq!(client.find_environment_by_name("", "Dup").unwrap().id, "1");
}

#[test]
fn inventory_is_fetched_on_every_lookup() {
    let client = client(ScriptedPlane::default().with_environments(&[("Production", "1")]));

    client.find_environment_by_name("", "Production").unwrap();
    client.find_environment_by_name("", "Production").unwrap();
    assert_eq!(client.plane().count("list-environments"), 2);
}

#[test]
fn transient_inventory_failure_is_retried() {
    let plane = ScriptedPlane::default().with_environments(&[("Production", "1")]);
    *plane.environment_failures.lock().unwrap() = 2;
    let client = client(plane);

    client.find_environment_by_name("", "Production").unwrap();
    assert_eq!(client.plane().count("list-environments"), 3);
}

#[test]
fn persistent_inventory_failure_escalates() {
    let plane = ScriptedPlane::default().with_environments(&[("Production", "1")]);
    *plane.environment_failures.lock().unwrap() = 10;
    let client = client(plane);

    let err = client.find_environment_by_name("", "Production").unwrap_err();
    assert!(matches!(err, DeployError::Transport { attempts: 3, .. }));
}

#[test]
fn find_server_within_environment() {
    let client = client(
        ScriptedPlane::default()
            .with_environments(&[("Production", "1")])
            .with_targets("1", &[("server-a", "10"), ("server-b", "11")]),
    );

    let env = client.find_environment_by_name("", "Production").unwrap();
    let target = client.find_server_by_name(&env, "server-b").unwrap();
    assert_eq!(target.id, "11");

    let err = client.find_server_by_name(&env, "server-c").unwrap_err();
    assert!(matches!(err, DeployError::NotFound { kind: LookupKind::Target, .. }));
}

// === Submission ===

#[test]
fn deploy_returns_submission_without_polling() {
    let client = client(ScriptedPlane::default());
    let params = DeploymentParams::new(DeploymentKind::Agent, "hello");

    let submission = client.deploy(Path::new("/a.jar"), &params).unwrap();
    assert_eq!(submission.id, ApplicationId::new("id-hello"));
    assert_eq!(submission.application, "hello");
    assert_eq!(client.plane().count("get-status"), 0);
}

#[test]
fn submit_is_never_retried() {
    let plane = ScriptedPlane {
        submit_error: Some(ControlPlaneError::Transient("timeout".into())),
        ..Default::default()
    };
    let client = client(plane);
    let params = DeploymentParams::new(DeploymentKind::Agent, "hello");

    let err = client.deploy(Path::new("/a.jar"), &params).unwrap_err();
    assert!(matches!(err, DeployError::Transport { attempts: 1, .. }));
    assert_eq!(client.plane().count("submit"), 1);
}

// === Polling ===

#[test]
fn poll_succeeds_on_third_status() {
    let client = client(ScriptedPlane::default().with_statuses(&[
        DeploymentStatus::NotStarted,
        DeploymentStatus::NotStarted,
        DeploymentStatus::Started,
    ]));

    let polls = client
        .poll_until_started(&submission(), PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap();
    assert_eq!(polls, 3);
}

#[test]
fn never_started_times_out() {
    let client = client(ScriptedPlane::default().with_fallback_status(DeploymentStatus::NotStarted));

    let err = client
        .poll_until_started(&submission(), PollSettings::new(INTERVAL, INTERVAL))
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::DeploymentTimeout { expected: "started", timeout, .. } if timeout == INTERVAL
    ));
}

#[test]
fn failed_stops_polling_immediately() {
    let client = client(ScriptedPlane::default().with_statuses(&[
        DeploymentStatus::NotStarted,
        DeploymentStatus::Failed,
        DeploymentStatus::Started,
    ]));

    let err = client
        .poll_until_started(&submission(), PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap_err();
    assert!(matches!(err, DeployError::DeploymentFailed { ref id, .. } if id == "id-hello"));
    assert_eq!(client.plane().count("get-status"), 2);
}

#[test]
fn transient_status_errors_are_retried_then_escalated() {
    let transient = || Err(ControlPlaneError::Transient("reset".into()));
    let client = client(ScriptedPlane::default().with_status_results(vec![
        transient(),
        Ok(DeploymentStatus::Started),
    ]));
    client
        .poll_until_started(&submission(), PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap();

    let client = self::client(ScriptedPlane::default().with_status_results(vec![
        transient(),
        transient(),
        transient(),
    ]));
    let err = client
        .poll_until_started(&submission(), PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap_err();
    assert!(matches!(err, DeployError::Transport { attempts: 3, .. }));
}

#[test]
fn budget_runs_from_submission() {
    let client = client(ScriptedPlane::default().with_fallback_status(DeploymentStatus::NotStarted));
    let mut late = submission();
    late.submitted_at -= Duration::from_secs(5);

    let err = client
        .poll_until_started(&late, PollSettings::new(Duration::from_secs(1), INTERVAL))
        .unwrap_err();
    assert!(matches!(err, DeployError::DeploymentTimeout { .. }));
    assert_eq!(client.plane().count("get-status"), 1);
}

#[test]
fn status_retries_stay_within_poll_budget() {
    let transient = || Err(ControlPlaneError::Transient("reset".into()));
    let plane = ScriptedPlane::default().with_status_results(vec![
        Ok(DeploymentStatus::NotStarted),
        transient(),
        transient(),
        transient(),
    ]);
    let client = LifecycleClient::new(plane)
        .with_retry(RetryPolicy::default().with_delay(Duration::from_millis(500)));
    let began = Instant::now();

    let err = client
        .poll_until_started(
            &submission(),
            PollSettings::new(Duration::from_millis(20), INTERVAL),
        )
        .unwrap_err();

    assert!(began.elapsed() < Duration::from_millis(400));
    assert!(matches!(err, DeployError::Transport { .. }));
}

#[test]
fn stop_poll_ends_once_not_started() {
    let client = client(ScriptedPlane::default().with_statuses(&[
        DeploymentStatus::Started,
        DeploymentStatus::NotStarted,
    ]));

    let polls = client
        .poll_until_stopped(&submission(), PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap();
    assert_eq!(polls, 2);
}

#[test]
fn failed_application_counts_as_stopped() {
    let client = client(ScriptedPlane::default().with_statuses(&[DeploymentStatus::Failed]));

    let polls = client
        .poll_until_stopped(&submission(), PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap();
    assert_eq!(polls, 1);
}

#[test]
fn still_started_times_out_as_stopped() {
    let client = client(ScriptedPlane::default().with_fallback_status(DeploymentStatus::Started));

    let err = client
        .poll_until_stopped(&submission(), PollSettings::new(INTERVAL, INTERVAL))
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::DeploymentTimeout { expected: "stopped", .. }
    ));
}

#[test]
fn undeploy_then_stop_poll_emits_undeployed() {
    let sink = Arc::new(RecordingEventSink::default());
    let client = client(ScriptedPlane::default().with_deployed("hello", "id-hello"))
        .with_events(sink.clone());

    let removal = client
        .undeploy("hello", &ApplicationId::new("id-hello"))
        .unwrap();
    assert!(sink.events.lock().unwrap().is_empty());

    client
        .poll_until_stopped(&removal, PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap();
    assert_eq!(removal.application, "hello");
    assert!(matches!(
        sink.events.lock().unwrap().last(),
        Some(DeployEvent::Undeployed { application }) if application == "hello"
    ));
}

#[test]
fn is_started_is_a_single_check() {
    let client = client(ScriptedPlane::default().with_statuses(&[DeploymentStatus::Started]));
    assert!(client.is_started(&ApplicationId::new("id-hello")).unwrap());
    assert!(!client.is_started(&ApplicationId::new("id-hello")).unwrap());

    let client = self::client(ScriptedPlane::default().with_status_results(vec![Err(
        ControlPlaneError::Transient("reset".into()),
    )]));
    assert!(client.is_started(&ApplicationId::new("id-hello")).is_err());
    assert_eq!(client.plane().count("get-status"), 1);
}

#[test]
fn poll_emits_status_events() {
    let sink = Arc::new(RecordingEventSink::default());
    let client = client(ScriptedPlane::default().with_statuses(&[
        DeploymentStatus::NotStarted,
        DeploymentStatus::Started,
    ]))
    .with_events(sink.clone());

    client
        .poll_until_started(&submission(), PollSettings::new(INTERVAL * 50, INTERVAL))
        .unwrap();

    let events = sink.events.lock().unwrap();
    let polled: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            DeployEvent::StatusPolled { attempt, status, .. } => Some((*attempt, *status)),
            _ => None,
        })
        .collect();
    assert_eq!(
        polled,
        vec![(1, DeploymentStatus::NotStarted), (2, DeploymentStatus::Started)]
    );
}
