//! The handler-under-test capability.
//!
//! Anything that can turn a request into a response asynchronously can be
//! driven: an `axum::Router` (or any tower service) through
//! [`ServiceHandler`], or a plain async closure through [`handler_fn`].

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower::BoxError;

mod func;
mod service;

pub use func::{HandlerFn, handler_fn};
pub use service::ServiceHandler;

/// Returned by the adapters when the token fires before the handler completes.
#[derive(Debug, Error)]
#[error("request was cancelled before the handler completed")]
pub struct Cancelled;

#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn send(
        &self,
        request: Request<Body>,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError>;
}

#[async_trait]
impl<H> MessageHandler for Arc<H>
where
    H: MessageHandler + ?Sized,
{
    async fn send(
        &self,
        request: Request<Body>,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError> {
        (**self).send(request, cancel).await
    }
}

pub(crate) async fn until_cancelled<F>(
    cancel: &CancellationToken,
    dispatch: F,
) -> Result<Response, BoxError>
where
    F: Future<Output = Result<Response, BoxError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Box::new(Cancelled) as BoxError),
        result = dispatch => result,
    }
}
