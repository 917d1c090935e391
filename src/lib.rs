//! In-process test driver for HTTP message handlers.
//!
//! A [`HandlerTestDriver`] owns the routing configuration and the handler
//! under test for one fixture. Each GET it issues is a synthetic
//! `http::Request` carrying the active [`HttpConfiguration`] and the
//! resolved [`RouteData`] as extensions; the handler's response comes back
//! buffered as a [`TestResponse`].
//!
//! ```ignore
//! let mut driver = HandlerTestDriver::new("{controller}/{id}")?;
//! driver.set_up_default_route_for::<WidgetsController>()?;
//! driver.set_handler(ServiceHandler::new(router));
//!
//! let widget: Widget = driver.get("widgets/1")?;
//! let raw = driver.get_as_string("widgets/1")?;
//! ```

pub mod config;
pub mod configuration;
pub mod controller;
pub mod driver;
pub mod error;
pub mod extractors;
pub mod handler;
pub mod response;
pub mod routing;
pub mod telemetry;

pub use config::{ConfigError, HarnessConfig};
pub use configuration::{
    ConfigurationFactory, HttpConfiguration, JsonFormatter, NullValueHandling, SerializerSettings,
};
pub use controller::ControllerType;
pub use driver::{DriverBuilder, HandlerTestDriver, REQUEST_ID_HEADER};
pub use error::{DriverError, DriverResult};
pub use extractors::{RequestConfiguration, RequestPropertiesExt};
pub use handler::{Cancelled, HandlerFn, MessageHandler, ServiceHandler, handler_fn};
pub use response::TestResponse;
pub use routing::{HttpRoute, RouteCollection, RouteData, RouteError, RouteValue, RouteValueDictionary};
