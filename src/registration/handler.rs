//! Per-client provisioning.
//!
//! # Responsibilities
//! - Turn a registration payload into an endpoint name
//! - Sync the client's clock, then start each configured observation
//! - Report the outcome of every call

use std::time::Instant;

use thiserror::Error;

use crate::config::{CollectorConfig, ProvisioningConfig};
use crate::lwm2m::{ServerClient, ServerError, ServerResponse, STATUS_CHANGED, STATUS_CONTENT};
use crate::observability::metrics;
use crate::registration::event::{EventError, RegistrationEvent};
use crate::resilience::{call_with_retry, CallOutcome, RetryPolicy};

/// Anything that aborts the handling of one event.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// What happened while provisioning one client.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionReport {
    pub endpoint: String,

    /// `None` when time sync is disabled.
    pub time_sync: Option<CallOutcome<ServerResponse>>,

    /// One entry per observed object, in call order.
    pub observations: Vec<(u16, CallOutcome<ServerResponse>)>,
}

impl ProvisionReport {
    fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            time_sync: None,
            observations: Vec::new(),
        }
    }

    /// Every call succeeded.
    pub fn is_complete(&self) -> bool {
        self.time_sync.as_ref().map_or(true, |outcome| outcome.succeeded)
            && self.observations.iter().all(|(_, outcome)| outcome.succeeded)
    }

    /// Objects whose observation was not started.
    pub fn failed_objects(&self) -> Vec<u16> {
        self.observations
            .iter()
            .filter(|(_, outcome)| outcome.is_exhausted())
            .map(|(object, _)| *object)
            .collect()
    }
}

/// Provisions newly registered clients against the device-management server.
#[derive(Debug, Clone)]
pub struct RegistrationHandler {
    client: ServerClient,
    policy: RetryPolicy,
    plan: ProvisioningConfig,
}

impl RegistrationHandler {
    pub fn new(client: ServerClient, policy: RetryPolicy, plan: ProvisioningConfig) -> Self {
        Self {
            client,
            policy,
            plan,
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Result<Self, ServerError> {
        let client = ServerClient::new(&config.server)?;
        Ok(Self::new(
            client,
            RetryPolicy::from(&config.retries),
            config.provisioning.clone(),
        ))
    }

    /// Parse `payload` and provision the client it names.
    pub async fn handle(&self, payload: &[u8]) -> Result<ProvisionReport, HandlerError> {
        let event = RegistrationEvent::from_slice(payload)?;

        tracing::info!(
            endpoint = %event.endpoint,
            registration_id = ?event.registration_id,
            "Client registered"
        );

        Ok(self.provision(&event.endpoint).await?)
    }

    /// Time sync first, then each observation in configured order.
    ///
    /// A transport error or a reply without a status marker stops the
    /// sequence. Calls exhausted on JSON replies do not.
    pub async fn provision(&self, endpoint: &str) -> Result<ProvisionReport, ServerError> {
        let start = Instant::now();
        let mut report = ProvisionReport::new(endpoint);

        if self.plan.sync_time {
            report.time_sync = Some(self.sync_time(endpoint).await?);
        }

        for &object in &self.plan.objects {
            let outcome = self.start_observation(endpoint, object).await?;
            report.observations.push((object, outcome));
        }

        metrics::record_provision_duration(start);
        Ok(report)
    }

    /// Write the current UTC time to the client, retrying until `CHANGED`.
    pub async fn sync_time(&self, endpoint: &str) -> Result<CallOutcome<ServerResponse>, ServerError> {
        let outcome = call_with_retry(
            &self.policy,
            |attempt| async move {
                let now = timestamp_now();
                tracing::debug!(endpoint, attempt, time = %now, "Syncing time");
                self.client.write_time(endpoint, &now).await?.require_marker_if_ok()
            },
            |response| response.is_ok_with(STATUS_CHANGED),
        )
        .await
        .and_then(require_final_marker)?;

        metrics::record_call("time_sync", outcome.attempts, outcome.succeeded);
        if outcome.succeeded {
            tracing::info!(endpoint, attempts = outcome.attempts, "Synchronized client time");
        } else {
            tracing::warn!(
                endpoint,
                attempts = outcome.attempts,
                http_status = %outcome.response.status,
                status = outcome.response.marker().unwrap_or("-"),
                "Time sync failed"
            );
        }

        Ok(outcome)
    }

    /// Start observing `object`, retrying until `CONTENT`.
    pub async fn start_observation(
        &self,
        endpoint: &str,
        object: u16,
    ) -> Result<CallOutcome<ServerResponse>, ServerError> {
        let instance = self.plan.instance;
        let outcome = call_with_retry(
            &self.policy,
            |_| async move {
                self.client
                    .observe(endpoint, object, instance)
                    .await?
                    .require_marker_if_ok()
            },
            |response| response.is_ok_with(STATUS_CONTENT),
        )
        .await
        .and_then(require_final_marker)?;

        metrics::record_call("observe", outcome.attempts, outcome.succeeded);
        if outcome.succeeded {
            tracing::info!(endpoint, object, instance, attempts = outcome.attempts, "Started observation");
        } else {
            tracing::warn!(
                endpoint,
                object,
                instance,
                attempts = outcome.attempts,
                http_status = %outcome.response.status,
                status = outcome.response.marker().unwrap_or("-"),
                "Observation not started"
            );
        }

        Ok(outcome)
    }
}

/// An exhausted call whose last reply was not JSON aborts the event.
fn require_final_marker(
    outcome: CallOutcome<ServerResponse>,
) -> Result<CallOutcome<ServerResponse>, ServerError> {
    if outcome.is_exhausted() && outcome.response.body.is_none() {
        return Err(ServerError::NoStatusMarker(outcome.response.status));
    }
    Ok(outcome)
}

/// Current UTC time as written to the Current Time resource.
pub fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
