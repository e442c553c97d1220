use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::warn;

use crate::capture::{CaptureState, FrameSource};
use crate::command::Command;
use crate::controller::{ImagePolicy, SubmissionController, SubmissionState};
use crate::identifier::{IdentifierMode, IdentifierState};
use crate::notification::{DEFAULT_TTL, Notification, NotificationChannel};
use crate::recommend::{Outcome, RecommendationResult, Recommender};

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub notification_ttl: Duration,
    pub image_policy: ImagePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            notification_ttl: DEFAULT_TTL,
            image_policy: ImagePolicy::Required,
        }
    }
}

/// All client state for one user session.
///
/// Every mutation goes through one of the intent methods. Request outcomes
/// arrive on the channel handed to [`Session::new`]; the owner of the
/// receiving end feeds them back through [`Session::complete`].
pub struct Session {
    identifier: IdentifierState,
    capture: CaptureState,
    controller: SubmissionController,
    source: Arc<dyn FrameSource>,
    recommender: Arc<dyn Recommender>,
    outcomes: UnboundedSender<Outcome>,
}

impl Session {
    pub fn new(
        source: Arc<dyn FrameSource>,
        recommender: Arc<dyn Recommender>,
        config: SessionConfig,
        outcomes: UnboundedSender<Outcome>,
    ) -> Self {
        Self {
            identifier: IdentifierState::new(),
            capture: CaptureState::new(),
            controller: SubmissionController::new(
                config.image_policy,
                NotificationChannel::new(config.notification_ttl),
            ),
            source,
            recommender,
            outcomes,
        }
    }

    pub fn set_mode(&mut self, mode: IdentifierMode) {
        self.identifier.set_mode(mode);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.identifier.set_text(text);
    }

    /// Take a still from the live source; a not-ready source raises a warning.
    pub fn capture(&mut self) {
        if let Err(e) = self.capture.capture(self.source.as_ref()) {
            self.controller.report_capture(&e);
        }
    }

    pub fn retake(&mut self) {
        self.capture.clear();
    }

    /// Start a request if the controller allows one.
    ///
    /// Returns immediately; the outcome is delivered on the outcome channel.
    /// Returns `false` when the submit was ignored.
    pub fn submit(&mut self) -> bool {
        let request = match self.controller.begin(&self.identifier, &self.capture) {
            Ok(request) => request,
            Err(_) => return false,
        };
        let recommender = Arc::clone(&self.recommender);
        let tx = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = Outcome::from(recommender.recommend(&request).await);
            if tx.send(outcome).is_err() {
                warn!(target: "submission", "outcome dropped, session is gone");
            }
        });
        true
    }

    /// Feed a request outcome back into the state machine.
    pub fn complete(&mut self, outcome: Outcome) {
        self.controller.finish(outcome);
    }

    pub fn dismiss(&mut self) {
        self.controller.notifications_mut().dismiss();
    }

    /// Hide the notification if its time is up.
    pub fn expire_notifications(&mut self) {
        self.controller.notifications_mut().expire();
    }

    /// When the visible notification should disappear.
    pub fn notification_deadline(&self) -> Option<Instant> {
        self.controller.notifications().deadline()
    }

    /// Apply a parsed user command. Returns `false` for [`Command::Quit`].
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Mode(mode) => self.set_mode(mode),
            Command::Id(text) => self.set_text(text),
            Command::Capture => self.capture(),
            Command::Retake => self.retake(),
            Command::Submit => {
                self.submit();
            }
            Command::Dismiss => self.dismiss(),
            Command::Show | Command::Help => {}
            Command::Quit => return false,
        }
        true
    }

    pub fn identifier(&self) -> &IdentifierState {
        &self.identifier
    }

    pub fn capture_state(&self) -> &CaptureState {
        &self.capture
    }

    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.state() == SubmissionState::InFlight
    }

    /// Inputs are complete; ignores whether a request is in flight.
    pub fn is_ready(&self) -> bool {
        self.controller.is_ready(&self.identifier, &self.capture)
    }

    /// The submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.controller.can_submit(&self.identifier, &self.capture)
    }

    pub fn result(&self) -> Option<&RecommendationResult> {
        self.controller.result()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.controller.notifications().visible()
    }
}
