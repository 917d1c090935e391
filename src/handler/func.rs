use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use tokio_util::sync::CancellationToken;
use tower::BoxError;

use super::{MessageHandler, until_cancelled};

/// Async closure handler. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps `f` so it can be assigned as the handler under test.
///
/// ```ignore
/// driver.set_handler(handler_fn(|_req| async {
///     Ok(StatusCode::NO_CONTENT.into_response())
/// }));
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    HandlerFn { f }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> MessageHandler for HandlerFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    async fn send(
        &self,
        request: Request<Body>,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError> {
        until_cancelled(&cancel, (self.f)(request)).await
    }
}
