use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::capture::CapturedImage;
use crate::identifier::IdentifierMode;

/// Snapshot of everything needed for one outbound call.
///
/// Built once at submit time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    mode: IdentifierMode,
    identifier: String,
    image: Option<CapturedImage>,
}

impl SubmissionRequest {
    pub fn new(
        mode: IdentifierMode,
        identifier: impl Into<String>,
        image: Option<CapturedImage>,
    ) -> Self {
        Self {
            mode,
            identifier: identifier.into(),
            image,
        }
    }

    pub fn mode(&self) -> IdentifierMode {
        self.mode
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }
}

/// A single recommended product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedItem {
    #[serde(deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default)]
    pub title: String,
}

impl RecommendedItem {
    pub fn new(product_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
        }
    }

    /// Storefront search link for this item, e.g. `<base>?term=42`.
    pub fn store_link(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut().append_pair("term", &self.product_id);
        url
    }
}

/// Emotion label plus the ordered recommendations for one submission.
///
/// An empty `emotion` means the label could not be determined. Item order is
/// the order the service returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationResult {
    pub emotion: String,
    pub items: Vec<RecommendedItem>,
}

#[derive(Debug, Serialize)]
struct RecommendBody<'a> {
    image: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    #[serde(default)]
    emotion: String,
    games: Vec<RecommendedItem>,
}

impl From<RecommendResponse> for RecommendationResult {
    fn from(resp: RecommendResponse) -> Self {
        Self {
            emotion: resp.emotion,
            items: resp.games,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("base url cannot carry path segments: {0}")]
    Url(String),
    #[error("request failed: {0}")]
    Http(reqwest::Error),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("request timed out")]
    TimedOut,
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RecommendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecommendError::TimedOut
        } else if e.is_decode() {
            RecommendError::Decode(e.to_string())
        } else {
            RecommendError::Http(e)
        }
    }
}

/// Terminal result of one submission, consumed by the controller.
#[derive(Debug)]
pub enum Outcome {
    Success(RecommendationResult),
    /// The call succeeded but returned no items.
    EmptyResult(RecommendationResult),
    Failure(RecommendError),
}

impl From<Result<RecommendationResult, RecommendError>> for Outcome {
    fn from(res: Result<RecommendationResult, RecommendError>) -> Self {
        match res {
            Ok(result) if result.items.is_empty() => Outcome::EmptyResult(result),
            Ok(result) => Outcome::Success(result),
            Err(e) => Outcome::Failure(e),
        }
    }
}

/// The remote recommendation service.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        request: &SubmissionRequest,
    ) -> Result<RecommendationResult, RecommendError>;
}

/// [`Recommender`] talking JSON over HTTP to `POST /recommend/{mode}/{id}`.
#[derive(Clone)]
pub struct HttpRecommender {
    client: reqwest::Client,
    base: Url,
    timeout: Option<Duration>,
}

impl HttpRecommender {
    /// Create a client for the service at `base`.
    ///
    /// `timeout` bounds each whole request; `None` leaves it to the transport.
    pub fn new(base: Url, timeout: Option<Duration>) -> Result<Self, RecommendError> {
        if base.cannot_be_a_base() {
            return Err(RecommendError::Url(base.to_string()));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base,
            timeout,
        })
    }

    /// Endpoint URL for the given mode and identifier.
    pub fn endpoint(&self, mode: IdentifierMode, identifier: &str) -> Result<Url, RecommendError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RecommendError::Url(self.base.to_string()))?
            .pop_if_empty()
            .push("recommend")
            .push(mode.path_segment())
            .push(identifier);
        Ok(url)
    }
}

#[async_trait]
impl Recommender for HttpRecommender {
    async fn recommend(
        &self,
        request: &SubmissionRequest,
    ) -> Result<RecommendationResult, RecommendError> {
        let url = self.endpoint(request.mode(), request.identifier())?;
        let image = request.image().map(CapturedImage::data_uri);
        let body = RecommendBody {
            image: image.as_deref(),
        };
        debug!(target: "submission", %url, with_image = image.is_some(), "posting recommendation request");
        let mut req = self.client.post(url).json(&body);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(target: "submission", %status, "recommendation service rejected request");
            return Err(RecommendError::Status(status.as_u16()));
        }
        let wire: RecommendResponse = resp.json().await?;
        Ok(wire.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommender(base: &str) -> HttpRecommender {
        HttpRecommender::new(Url::parse(base).unwrap(), None).unwrap()
    }

    #[test]
    fn endpoint_routes_by_mode() {
        let r = recommender("http://localhost:5000");
        assert_eq!(
            r.endpoint(IdentifierMode::User, "alice123").unwrap().as_str(),
            "http://localhost:5000/recommend/user/alice123"
        );
        assert_eq!(
            r.endpoint(IdentifierMode::Product, "999999").unwrap().as_str(),
            "http://localhost:5000/recommend/game/999999"
        );
    }

    #[test]
    fn endpoint_encodes_identifier_as_one_segment() {
        let r = recommender("http://localhost:5000/api/");
        let url = r.endpoint(IdentifierMode::User, "a b/c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/recommend/user/a%20b%2Fc");
    }

    #[test]
    fn rejects_non_base_urls() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            HttpRecommender::new(base, None),
            Err(RecommendError::Url(_))
        ));
    }

    #[test]
    fn response_keeps_order_and_accepts_numeric_ids() {
        let body = r#"{"emotion":"sad","games":[{"product_id":7,"title":"B"},{"product_id":"3","title":"A"}]}"#;
        let resp: RecommendResponse = serde_json::from_str(body).unwrap();
        let result = RecommendationResult::from(resp);
        assert_eq!(result.emotion, "sad");
        assert_eq!(
            result.items,
            vec![RecommendedItem::new("7", "B"), RecommendedItem::new("3", "A")]
        );
    }

    #[test]
    fn missing_emotion_means_undetermined() {
        let resp: RecommendResponse = serde_json::from_str(r#"{"games":[]}"#).unwrap();
        assert_eq!(RecommendationResult::from(resp).emotion, "");
    }

    #[test]
    fn outcome_classifies_empty_results() {
        let empty = RecommendationResult {
            emotion: "neutral".into(),
            items: vec![],
        };
        assert!(matches!(Outcome::from(Ok(empty)), Outcome::EmptyResult(_)));
        let full = RecommendationResult {
            emotion: "happy".into(),
            items: vec![RecommendedItem::new("42", "Stardew Valley")],
        };
        assert!(matches!(Outcome::from(Ok(full)), Outcome::Success(_)));
        assert!(matches!(
            Outcome::from(Err(RecommendError::TimedOut)),
            Outcome::Failure(RecommendError::TimedOut)
        ));
    }

    #[test]
    fn store_link_searches_by_product_id() {
        let base = Url::parse("https://store.steampowered.com/search/").unwrap();
        let item = RecommendedItem::new("Half Life", "x");
        assert_eq!(
            item.store_link(&base).as_str(),
            "https://store.steampowered.com/search/?term=Half+Life"
        );
    }
}
