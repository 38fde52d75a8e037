//! Demo CRUD backend
//!
//! A small axum service with `users` and `products` fixtures to point the
//! workbench at. State lives in memory and resets on restart.

pub mod error;
pub mod routes;
pub mod store;

pub use error::{DemoError, FieldError};
pub use routes::{router, DemoState};
pub use store::ResourceStore;

use std::future::Future;
use std::io;
use tokio::net::TcpListener;

/// Serves the demo router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: DemoState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        log::info!("Demo server listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
