/*
 * Responsibility
 * - axum FromRequestParts impls for the driver-attached metadata
 * - a missing entry means the request did not come through the driver:
 *   reject with 500 and say so in the log
 */
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use super::properties::RequestPropertiesExt;
use crate::configuration::HttpConfiguration;
use crate::routing::RouteData;

/// The configuration the driver attached to the request.
#[derive(Debug, Clone)]
pub struct RequestConfiguration(pub Arc<HttpConfiguration>);

impl<S> FromRequestParts<S> for RequestConfiguration
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.configuration().cloned().map(Self).ok_or_else(|| {
            tracing::warn!(uri = %parts.uri, "request carries no HttpConfiguration");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

impl<S> FromRequestParts<S> for RouteData
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.route_data().cloned().ok_or_else(|| {
            tracing::warn!(uri = %parts.uri, "request carries no RouteData");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}
