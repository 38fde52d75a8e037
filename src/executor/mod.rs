//! HTTP request executor.
//!
//! [`invoke`] puts an [`AssembledRequest`] on the wire through a [`Transport`]
//! and always produces an [`ApiResponse`]. Transport failures of any kind
//! (unreachable host, timeout, TLS, cancellation) become the status-0
//! sentinel built by [`ApiResponse::transport_error`]; they are never
//! propagated to the caller. No request is ever retried.

pub mod cancellation;
pub mod config;
pub mod error;
pub mod transport;

pub use cancellation::{
    CancelError, CancelToken, RequestHandle, RequestTracker, SharedRequestTracker,
};
pub use config::ExecutionConfig;
pub use error::RequestError;
pub use transport::{RawResponse, ReqwestTransport, Transport};

use crate::assembler::AssembledRequest;
use crate::models::ApiResponse;
use std::time::Instant;

/// Executes a request and normalizes the outcome.
///
/// `time` spans from just before dispatch to full body receipt, in
/// milliseconds. `size` is the byte length of the body as received.
pub async fn invoke(
    transport: &dyn Transport,
    request: &AssembledRequest,
    config: &ExecutionConfig,
) -> ApiResponse {
    let start = Instant::now();
    let result = transport.send(request, config).await;
    finish(request, result, start)
}

/// Like [`invoke`], but gives up as soon as `token` is cancelled.
///
/// A cancelled request yields the sentinel with the message
/// `"Request cancelled"`.
pub async fn invoke_cancellable(
    transport: &dyn Transport,
    request: &AssembledRequest,
    config: &ExecutionConfig,
    mut token: CancelToken,
) -> ApiResponse {
    let start = Instant::now();
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => Err(RequestError::Cancelled),
        result = transport.send(request, config) => result,
    };
    finish(request, result, start)
}

fn finish(
    request: &AssembledRequest,
    result: Result<RawResponse, RequestError>,
    start: Instant,
) -> ApiResponse {
    let time = elapsed_ms(start);

    match result {
        Ok(raw) => {
            log::info!(
                "{} {} -> {} in {:.0} ms ({} bytes)",
                request.method,
                request.url,
                raw.status,
                time,
                raw.body.len()
            );
            ApiResponse {
                status: raw.status,
                status_text: raw.status_text,
                headers: raw.headers,
                body: String::from_utf8_lossy(&raw.body).into_owned(),
                time,
                size: raw.body.len(),
            }
        }
        Err(e) => {
            log::warn!("{} {} failed: {}", request.method, request.url, e);
            ApiResponse::transport_error(e.to_string(), time)
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
