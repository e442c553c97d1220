use axum::{
    Router,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::{Html, IntoResponse},
    routing::get,
};
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::capture::FrameSource;

const INDEX: &str = include_str!("camera.html");

/// Live camera feed pushed by a browser over a WebSocket.
///
/// Serves:
/// - `/` a page that opens the user's camera and streams JPEG frames
/// - `/camera-jpeg-in` the WebSocket receiving those frames
///
/// The latest frame is kept so a capture can take it synchronously. Once the
/// last connected page goes away the frame is dropped and the feed reports
/// not ready again.
pub struct Webcam {
    frames: watch::Sender<Option<Bytes>>,
    pages: AtomicUsize,
}

impl Default for Webcam {
    fn default() -> Self {
        let (frames, _) = watch::channel(None);
        Self {
            frames,
            pages: AtomicUsize::new(0),
        }
    }
}

impl Webcam {
    /// Watch incoming frames.
    #[cfg(test)]
    fn subscribe(&self) -> watch::Receiver<Option<Bytes>> {
        self.frames.subscribe()
    }

    /// Build a router exposing the camera page and WebSocket endpoint.
    pub fn router(self: Arc<Self>) -> Router {
        Router::new().route("/", get(Self::index)).route(
            "/camera-jpeg-in",
            get(move |ws: WebSocketUpgrade| {
                let cam = self.clone();
                async move { ws.on_upgrade(move |sock| cam.clone().session(sock)) }
            }),
        )
    }

    async fn index() -> impl IntoResponse {
        Html(INDEX)
    }

    async fn session(self: Arc<Self>, mut socket: WebSocket) {
        self.pages.fetch_add(1, Ordering::SeqCst);
        debug!(target: "webcam", "camera page connected");
        while let Some(msg) = socket.next().await {
            match msg {
                Ok(Message::Binary(data)) => {
                    tracing::trace!(target: "webcam", bytes = data.len(), "frame received");
                    self.frames.send_replace(Some(Bytes::from(data)));
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(target: "webcam", error = ?e, "camera socket failed");
                    break;
                }
            }
        }
        if self.pages.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.frames.send_replace(None);
        }
        debug!(target: "webcam", "camera page disconnected");
    }
}

impl FrameSource for Webcam {
    fn snapshot(&self) -> Option<Bytes> {
        self.frames.borrow().clone()
    }
}
