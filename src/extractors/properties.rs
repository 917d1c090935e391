/*
 * Responsibility
 * - typed access to the metadata the driver attaches to each request
 *   (Arc<HttpConfiguration>, RouteData) without going through an extractor
 * - usable from raw handler_fn closures and from middleware
 */
use std::sync::Arc;

use axum::http::{Extensions, Request, request::Parts};

use crate::configuration::HttpConfiguration;
use crate::routing::RouteData;

pub trait RequestPropertiesExt {
    fn properties(&self) -> &Extensions;

    fn configuration(&self) -> Option<&Arc<HttpConfiguration>> {
        self.properties().get::<Arc<HttpConfiguration>>()
    }

    fn route_data(&self) -> Option<&RouteData> {
        self.properties().get::<RouteData>()
    }
}

impl<B> RequestPropertiesExt for Request<B> {
    fn properties(&self) -> &Extensions {
        self.extensions()
    }
}

impl RequestPropertiesExt for Parts {
    fn properties(&self) -> &Extensions {
        &self.extensions
    }
}
