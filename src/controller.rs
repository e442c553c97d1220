use thiserror::Error;
use tracing::{debug, info, warn};

use crate::capture::{CaptureError, CaptureState};
use crate::identifier::{IdentifierMode, IdentifierState};
use crate::notification::{NotificationChannel, Severity};
use crate::recommend::{Outcome, RecommendError, RecommendationResult, SubmissionRequest};

pub const CONNECTIVITY_MESSAGE: &str = "Error! Check backend connection.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Check backend connection.";
pub const CAMERA_NOT_READY_MESSAGE: &str = "Camera not ready yet. Try capturing again.";

/// Warning shown when the service knows nothing about the identifier.
pub fn unknown_id_message(mode: IdentifierMode, identifier: &str) -> String {
    format!(
        "The {} ID {} might not exist in database",
        mode.label(),
        identifier.trim()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
}

/// Whether a capture is needed before submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePolicy {
    #[default]
    Required,
    Optional,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("submission preconditions not met")]
    ValidationBlocked,
    #[error("a request is already in flight")]
    InFlight,
}

/// Drives one submission at a time and interprets its outcome.
///
/// Sole writer of the recommendation result and of notifications.
#[derive(Debug, Default)]
pub struct SubmissionController {
    state: SubmissionState,
    policy: ImagePolicy,
    in_flight: Option<(IdentifierMode, String)>,
    result: Option<RecommendationResult>,
    notifications: NotificationChannel,
}

impl SubmissionController {
    pub fn new(policy: ImagePolicy, notifications: NotificationChannel) -> Self {
        Self {
            policy,
            notifications,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn result(&self) -> Option<&RecommendationResult> {
        self.result.as_ref()
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationChannel {
        &mut self.notifications
    }

    /// Inputs are complete enough to submit, ignoring any in-flight request.
    pub fn is_ready(&self, identifier: &IdentifierState, capture: &CaptureState) -> bool {
        identifier.is_valid()
            && (capture.has_image() || self.policy == ImagePolicy::Optional)
    }

    /// The submit control should be enabled.
    pub fn can_submit(&self, identifier: &IdentifierState, capture: &CaptureState) -> bool {
        self.state == SubmissionState::Idle && self.is_ready(identifier, capture)
    }

    /// Move to in-flight and snapshot the request to send.
    ///
    /// Leaves every piece of state untouched when rejected.
    pub fn begin(
        &mut self,
        identifier: &IdentifierState,
        capture: &CaptureState,
    ) -> Result<SubmissionRequest, SubmitError> {
        if self.state == SubmissionState::InFlight {
            debug!(target: "submission", "submit ignored, request already in flight");
            return Err(SubmitError::InFlight);
        }
        if !self.is_ready(identifier, capture) {
            debug!(target: "submission", "submit ignored, preconditions not met");
            return Err(SubmitError::ValidationBlocked);
        }
        let request = SubmissionRequest::new(
            identifier.mode(),
            identifier.text(),
            capture.image().cloned(),
        );
        info!(
            target: "submission",
            mode = %request.mode(),
            identifier = %request.identifier(),
            "submission started"
        );
        self.in_flight = Some((request.mode(), request.identifier().to_string()));
        self.state = SubmissionState::InFlight;
        Ok(request)
    }

    /// Apply the outcome of the in-flight request and return to idle.
    pub fn finish(&mut self, outcome: Outcome) {
        let Some((mode, identifier)) = self.in_flight.take() else {
            warn!(target: "submission", ?outcome, "outcome received with no request in flight");
            return;
        };
        self.state = SubmissionState::Idle;
        match outcome {
            Outcome::Success(result) => {
                info!(
                    target: "submission",
                    emotion = %result.emotion,
                    items = result.items.len(),
                    "recommendations received"
                );
                self.result = Some(result);
            }
            Outcome::EmptyResult(result) => {
                warn!(target: "submission", %mode, %identifier, "no recommendations for identifier");
                self.result = Some(result);
                self.notifications
                    .raise(unknown_id_message(mode, &identifier), Severity::Warning);
            }
            Outcome::Failure(e) => {
                warn!(target: "submission", error = %e, "recommendation request failed");
                let message = match e {
                    RecommendError::TimedOut => TIMEOUT_MESSAGE,
                    _ => CONNECTIVITY_MESSAGE,
                };
                self.notifications.raise(message, Severity::Error);
            }
        }
    }

    /// Surface a failed capture to the user.
    pub fn report_capture(&mut self, error: &CaptureError) {
        match error {
            CaptureError::SourceNotReady => {
                warn!(target: "submission", "capture attempted before camera was ready");
                self.notifications
                    .raise(CAMERA_NOT_READY_MESSAGE, Severity::Warning);
            }
        }
    }
}
