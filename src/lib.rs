pub mod args;
pub mod capture;
pub mod command;
pub mod controller;
pub mod identifier;
pub mod logger;
pub mod notification;
pub mod recommend;
pub mod server;
pub mod session;
pub mod view;
pub mod webcam;

pub use capture::{CaptureError, CaptureState, CapturedImage, FrameSource};
pub use command::Command;
pub use controller::{ImagePolicy, SubmissionController, SubmissionState, SubmitError};
pub use identifier::{IdentifierMode, IdentifierState};
pub use notification::{Notification, NotificationChannel, Severity};
pub use recommend::{
    HttpRecommender, Outcome, RecommendError, RecommendationResult, RecommendedItem, Recommender,
    SubmissionRequest,
};
pub use session::{Session, SessionConfig};
pub use webcam::Webcam;
