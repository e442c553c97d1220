use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::webcam::Webcam;

/// Serve the camera page and frame WebSocket on `addr`.
///
/// The listener is bound before returning so bind errors surface here.
pub async fn run_camera_server(
    webcam: Arc<Webcam>,
    addr: &str,
) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = webcam.router();
    let handle = tokio::spawn(async move {
        tracing::info!(target: "webcam", %addr, "serving camera page");
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(target: "webcam", error=?e, "camera server failed");
        }
    });
    Ok((addr, handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_camera_page() {
        let (addr, handle) = run_camera_server(Arc::new(Webcam::default()), "127.0.0.1:0")
            .await
            .unwrap();
        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("/camera-jpeg-in"));
        handle.abort();
    }
}
