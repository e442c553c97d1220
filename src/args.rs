use clap::Parser;
use std::time::Duration;
use url::Url;

use crate::controller::ImagePolicy;
use crate::session::SessionConfig;

/// Command line arguments for the emotion-sense binary.
#[derive(Parser, Clone, Debug)]
#[command(name = "emotion-sense", about = "Capture a photo and get game recommendations")]
pub struct Args {
    /// Base URL of the recommendation service.
    #[arg(long = "server-url", default_value = "http://localhost:5000")]
    pub server_url: Url,
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long = "timeout-secs", default_value_t = 30)]
    pub timeout_secs: u64,
    #[arg(long = "notify-secs", default_value_t = 5)]
    pub notify_secs: u64,
    /// Allow submitting without a captured photo.
    #[arg(long = "allow-no-photo")]
    pub allow_no_photo: bool,
    #[arg(long = "store-url", default_value = "https://store.steampowered.com/search/")]
    pub store_url: Url,
}

impl Args {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            notification_ttl: Duration::from_secs(self.notify_secs),
            image_policy: if self.allow_no_photo {
                ImagePolicy::Optional
            } else {
                ImagePolicy::Required
            },
        }
    }

    pub fn camera_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
