//! The test request driver.
//!
//! Holds the routing configuration and the handler under test for one test
//! fixture, builds synthetic GET requests, attaches the configuration and the
//! resolved route data to them, and dispatches them through the handler.
//!
//! Blocking entry points (`execute_get`, `get`, `get_as_string`) run the
//! dispatch on a current-thread runtime owned by the driver. Inside an async
//! test use the `*_async` variants (`send_get`, `get_async`,
//! `get_as_string_async`) instead.

use std::cell::OnceCell;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, Uri},
};
use serde::de::DeserializeOwned;
use tokio::runtime::{self, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, instrument};
use uuid::Uuid;

use crate::config::HarnessConfig;
use crate::configuration::{ConfigurationFactory, HttpConfiguration, default_factory};
use crate::controller::ControllerType;
use crate::error::{DriverError, DriverResult};
use crate::handler::{MessageHandler, ServiceHandler};
use crate::response::TestResponse;
use crate::routing::{HttpRoute, RouteData};
use crate::telemetry;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct HandlerTestDriver<H = ServiceHandler<axum::Router>> {
    base_route: Arc<HttpRoute>,
    configuration: Option<Arc<HttpConfiguration>>,
    handler: Option<H>,
    factory: ConfigurationFactory,
    settings: HarnessConfig,
    runtime: OnceCell<Runtime>,
}

pub struct DriverBuilder<H> {
    route_template: String,
    factory: ConfigurationFactory,
    settings: HarnessConfig,
    handler: Option<H>,
    init_tracing: bool,
}

impl<H> DriverBuilder<H> {
    /// Replaces the default configuration factory (nulls omitted from JSON).
    pub fn configuration_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> HttpConfiguration + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    pub fn settings(mut self, settings: HarnessConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Loads the settings with [`HarnessConfig::from_env`].
    pub fn settings_from_env(self) -> DriverResult<Self> {
        Ok(self.settings(HarnessConfig::from_env()?))
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Installs the fmt subscriber (filter from `settings.log_filter`) on build.
    pub fn init_tracing(mut self) -> Self {
        self.init_tracing = true;
        self
    }

    pub fn build(self) -> DriverResult<HandlerTestDriver<H>> {
        if self.init_tracing {
            telemetry::init_tracing(&self.settings.log_filter);
        }
        let base_route = Arc::new(HttpRoute::new(&self.route_template)?);

        Ok(HandlerTestDriver {
            base_route,
            configuration: None,
            handler: self.handler,
            factory: self.factory,
            settings: self.settings,
            runtime: OnceCell::new(),
        })
    }
}

impl<H> HandlerTestDriver<H> {
    /// `route_template` is the template every request's route data is resolved against.
    ///
    /// Settings come from the environment (`HARNESS_*`, `.env` honoured); use
    /// [`builder`](Self::builder) to pass them explicitly.
    pub fn new(route_template: &str) -> DriverResult<Self> {
        Self::builder(route_template).settings_from_env()?.build()
    }

    pub fn builder(route_template: &str) -> DriverBuilder<H> {
        DriverBuilder {
            route_template: route_template.to_owned(),
            factory: default_factory(),
            settings: HarnessConfig::default(),
            handler: None,
            init_tracing: false,
        }
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    pub fn set_handler(&mut self, handler: H) {
        self.handler = Some(handler);
    }

    pub fn take_handler(&mut self) -> Option<H> {
        self.handler.take()
    }

    pub fn base_route(&self) -> &HttpRoute {
        &self.base_route
    }

    pub fn settings(&self) -> &HarnessConfig {
        &self.settings
    }

    /// The configuration installed by the last successful `set_up_*` call.
    pub fn configuration(&self) -> Option<&Arc<HttpConfiguration>> {
        self.configuration.as_ref()
    }

    /// Resolves `uri` against the registered routes, with relative URIs joined
    /// onto `settings.base_url` the way requests are.
    pub fn route_data_for(&self, uri: &str) -> DriverResult<Option<RouteData>> {
        let configuration = self
            .configuration
            .as_ref()
            .ok_or(DriverError::RoutesNotConfigured)?;
        let target = self
            .settings
            .base_url
            .join(uri)
            .map_err(|e| DriverError::invalid_uri(uri, e))?;
        Ok(configuration.routes.get_route_data(target.path()))
    }

    /// Registers `<name>/{id}` for each controller in a fresh configuration.
    ///
    /// Fails on the first duplicate route name; the previous configuration
    /// stays installed in that case.
    #[instrument(skip_all)]
    pub fn set_up_default_routes_for<I>(&mut self, controllers: I) -> DriverResult<()>
    where
        I: IntoIterator<Item = ControllerType>,
    {
        let mut configuration = (self.factory)();
        for controller in controllers {
            let route = controller.route(&controller.default_template())?;
            configuration.routes.add(controller.route_name(), route)?;
        }

        info!(routes = configuration.routes.len(), "default routes configured");
        self.configuration = Some(Arc::new(configuration));
        Ok(())
    }

    pub fn set_up_default_route_for<T: ?Sized + 'static>(&mut self) -> DriverResult<()> {
        self.set_up_default_routes_for([ControllerType::of::<T>()])
    }

    pub fn set_up_custom_route_for<T: ?Sized + 'static>(
        &mut self,
        route_template: &str,
    ) -> DriverResult<()> {
        self.set_up_custom_route(ControllerType::of::<T>(), route_template)
    }

    /// Registers a single route with `route_template` used verbatim,
    /// discarding whatever was configured before.
    #[instrument(skip(self, controller), fields(controller = controller.name()))]
    pub fn set_up_custom_route(
        &mut self,
        controller: ControllerType,
        route_template: &str,
    ) -> DriverResult<()> {
        let mut configuration = (self.factory)();
        let route = controller.route(route_template)?;
        configuration.routes.add(controller.route_name(), route)?;

        info!(route = %controller.route_name(), "custom route configured");
        self.configuration = Some(Arc::new(configuration));
        Ok(())
    }

    fn build_request(
        &self,
        uri: &str,
        configuration: Arc<HttpConfiguration>,
    ) -> DriverResult<Request<Body>> {
        let target = self
            .settings
            .base_url
            .join(uri)
            .map_err(|e| DriverError::invalid_uri(uri, e))?;
        let target: Uri = target
            .as_str()
            .parse()
            .map_err(|e| DriverError::invalid_uri(uri, e))?;

        let route_data = self
            .base_route
            .get_route_data(target.path())
            .unwrap_or_else(|| RouteData::empty(Arc::clone(&self.base_route)));
        debug!(
            path = target.path(),
            template = self.base_route.route_template(),
            matched = !route_data.is_empty(),
            "route data resolved"
        );

        let mut request = Request::builder()
            .method(Method::GET)
            .uri(target)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .body(Body::empty())?;
        request.extensions_mut().insert(configuration);
        request.extensions_mut().insert(route_data);

        Ok(request)
    }

    fn runtime(&self) -> DriverResult<&Runtime> {
        if runtime::Handle::try_current().is_ok() {
            return Err(DriverError::BlockingInsideRuntime);
        }
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime);
        }

        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(DriverError::Runtime)?;
        Ok(self.runtime.get_or_init(|| runtime))
    }
}

impl<H: MessageHandler> HandlerTestDriver<H> {
    /// Dispatches `GET uri` through the handler and buffers the response.
    pub async fn send_get(&self, uri: &str) -> DriverResult<TestResponse> {
        let handler = self.handler.as_ref().ok_or(DriverError::HandlerNotSet)?;
        let configuration = self
            .configuration
            .clone()
            .ok_or(DriverError::RoutesNotConfigured)?;

        let request = self.build_request(uri, configuration)?;
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let span = info_span!("dispatch", %request_id, method = "GET", uri = %request.uri());

        async move {
            let dispatch = handler.send(request, CancellationToken::new());
            let response = match self.settings.dispatch_timeout {
                Some(limit) => tokio::time::timeout(limit, dispatch)
                    .await
                    .map_err(|_| DriverError::Timeout(limit))?,
                None => dispatch.await,
            }
            .map_err(|err| {
                debug!(error = %err, "handler faulted");
                DriverError::Dispatch(err)
            })?;

            let response = TestResponse::from_response(response).await?;
            debug!(status = %response.status(), bytes = response.body().len(), "handler responded");
            Ok::<_, DriverError>(response)
        }
        .instrument(span)
        .await
    }

    pub async fn get_async<T: DeserializeOwned>(&self, uri: &str) -> DriverResult<T> {
        self.send_get(uri).await?.json()
    }

    /// Asserts 200 OK with content, then returns the body text.
    ///
    /// # Panics
    ///
    /// When the handler answers with another status or without content.
    pub async fn get_as_string_async(&self, uri: &str) -> DriverResult<String> {
        let response = self.send_get(uri).await?;
        assert_ok_with_content(uri, &response);
        response.text()
    }

    /// Blocking [`send_get`](Self::send_get).
    pub fn execute_get(&self, uri: &str) -> DriverResult<TestResponse> {
        self.handler.as_ref().ok_or(DriverError::HandlerNotSet)?;
        self.runtime()?.block_on(self.send_get(uri))
    }

    pub fn get<T: DeserializeOwned>(&self, uri: &str) -> DriverResult<T> {
        self.execute_get(uri)?.json()
    }

    /// Blocking [`get_as_string_async`](Self::get_as_string_async).
    ///
    /// # Panics
    ///
    /// When the handler answers with another status or without content.
    pub fn get_as_string(&self, uri: &str) -> DriverResult<String> {
        let response = self.execute_get(uri)?;
        assert_ok_with_content(uri, &response);
        response.text()
    }
}

fn assert_ok_with_content(uri: &str, response: &TestResponse) {
    assert_eq!(
        StatusCode::OK,
        response.status(),
        "unexpected status code for GET {uri}"
    );
    assert!(
        response.has_content(),
        "response to GET {uri} has no content"
    );
}

impl<H: std::fmt::Debug> std::fmt::Debug for HandlerTestDriver<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTestDriver")
            .field("base_route", &self.base_route.route_template())
            .field("configuration", &self.configuration)
            .field("handler", &self.handler)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
