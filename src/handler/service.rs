/*
 * Responsibility
 * - adapt a tower Service (axum Router, MethodRouter, layered stacks) to MessageHandler
 * - every send() drives a fresh clone of the service with oneshot
 */
use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use tokio_util::sync::CancellationToken;
use tower::{BoxError, Service, ServiceExt};

use super::{MessageHandler, until_cancelled};

#[derive(Debug, Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn get_ref(&self) -> &S {
        &self.service
    }

    pub fn into_inner(self) -> S {
        self.service
    }
}

#[async_trait]
impl<S> MessageHandler for ServiceHandler<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    async fn send(
        &self,
        request: Request<Body>,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError> {
        let service = self.service.clone();
        let dispatch = async move { service.oneshot(request).await.map_err(Into::into) };
        until_cancelled(&cancel, dispatch).await
    }
}
