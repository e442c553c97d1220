use bytes::Bytes;
use emotion_sense::{
    CapturedImage, HttpRecommender, IdentifierMode, RecommendError, RecommendedItem, Recommender,
    SubmissionRequest,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use url::Url;

fn client(server: &MockServer, timeout: Option<Duration>) -> HttpRecommender {
    HttpRecommender::new(Url::parse(&server.base_url()).unwrap(), timeout).unwrap()
}

#[tokio::test]
async fn posts_image_as_data_uri_to_user_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/recommend/user/alice123")
                .json_body(json!({ "image": "data:image/jpeg;base64,aGk=" }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "emotion": "happy",
                    "games": [{ "product_id": "42", "title": "Stardew Valley" }]
                }));
        })
        .await;
    let request = SubmissionRequest::new(
        IdentifierMode::User,
        "alice123",
        Some(CapturedImage::jpeg(Bytes::from_static(b"hi"))),
    );
    let result = client(&server, None).recommend(&request).await.unwrap();
    assert_eq!(result.emotion, "happy");
    assert_eq!(result.items, vec![RecommendedItem::new("42", "Stardew Valley")]);
    mock.assert_async().await;
}

#[tokio::test]
async fn sends_null_image_without_capture() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/recommend/game/999999")
                .json_body(json!({ "image": null }));
            then.status(200)
                .json_body(json!({ "emotion": "neutral", "games": [] }));
        })
        .await;
    let request = SubmissionRequest::new(IdentifierMode::Product, "999999", None);
    let result = client(&server, None).recommend(&request).await.unwrap();
    assert_eq!(result.emotion, "neutral");
    assert!(result.items.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_is_status_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/recommend/user/bob");
            then.status(500)
                .json_body(json!({ "error": "Internal Server Error" }));
        })
        .await;
    let request = SubmissionRequest::new(IdentifierMode::User, "bob", None);
    let err = client(&server, None).recommend(&request).await.unwrap_err();
    assert!(matches!(err, RecommendError::Status(500)));
}

#[tokio::test]
async fn malformed_body_is_decode_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/recommend/user/bob");
            then.status(200).body("not json");
        })
        .await;
    let request = SubmissionRequest::new(IdentifierMode::User, "bob", None);
    let err = client(&server, None).recommend(&request).await.unwrap_err();
    assert!(matches!(err, RecommendError::Decode(_)));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/recommend/user/slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "emotion": "happy", "games": [] }));
        })
        .await;
    let request = SubmissionRequest::new(IdentifierMode::User, "slow", None);
    let err = client(&server, Some(Duration::from_millis(50)))
        .recommend(&request)
        .await
        .unwrap_err();
    assert!(matches!(err, RecommendError::TimedOut));
}

#[tokio::test]
async fn unreachable_service_is_http_failure() {
    let base = Url::parse("http://127.0.0.1:9").unwrap();
    let recommender = HttpRecommender::new(base, Some(Duration::from_secs(2))).unwrap();
    let request = SubmissionRequest::new(IdentifierMode::User, "alice", None);
    let err = recommender.recommend(&request).await.unwrap_err();
    assert!(matches!(err, RecommendError::Http(_) | RecommendError::TimedOut));
}
