/*
 * Responsibility
 * - HttpConfiguration: the route table + JSON formatter attached to every request
 * - default factory (nulls omitted from JSON output)
 * - ConfigurationFactory: injectable hook to customise the fresh configuration
 */
use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::DEFAULT_BASE_URL;
use crate::routing::{RouteCollection, RouteData};

/// Builds the configuration installed by each `set_up_*` call.
pub type ConfigurationFactory = Arc<dyn Fn() -> HttpConfiguration + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullValueHandling {
    #[default]
    Include,
    Ignore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializerSettings {
    pub null_value_handling: NullValueHandling,
}

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub serializer_settings: SerializerSettings,
}

impl JsonFormatter {
    pub fn to_value<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(value)?;
        if self.serializer_settings.null_value_handling == NullValueHandling::Ignore {
            strip_nulls(&mut value);
        }
        Ok(value)
    }

    pub fn to_string<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        match self.serializer_settings.null_value_handling {
            NullValueHandling::Include => serde_json::to_string(value),
            NullValueHandling::Ignore => serde_json::to_string(&self.to_value(value)?),
        }
    }

    /// JSON response honouring the serializer settings.
    ///
    /// A value that fails to serialize becomes a bare 500.
    pub fn to_response<T: Serialize + ?Sized>(&self, status: StatusCode, value: &T) -> Response {
        match self.to_string(value) {
            Ok(body) => (
                status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                )],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

// Object members only; nulls inside arrays are positional and stay.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpConfiguration {
    pub routes: RouteCollection,
    pub formatter: JsonFormatter,
}

impl HttpConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_null_value_handling(mut self, handling: NullValueHandling) -> Self {
        self.formatter.serializer_settings.null_value_handling = handling;
        self
    }

    /// Resolves `uri` against the registered routes. Absolute URIs are taken
    /// as given, relative ones are joined onto `http://localhost/`. The query
    /// string is ignored; an unparseable URI matches nothing.
    pub fn route_data_for(&self, uri: &str) -> Option<RouteData> {
        let target = Url::parse(DEFAULT_BASE_URL).and_then(|base| base.join(uri));
        match target {
            Ok(target) => self.routes.get_route_data(target.path()),
            Err(err) => {
                tracing::debug!(uri, error = %err, "uri does not resolve");
                None
            }
        }
    }
}

/// Configuration used when no factory is supplied: nulls are left out of JSON output.
pub fn default_configuration() -> HttpConfiguration {
    HttpConfiguration::new().with_null_value_handling(NullValueHandling::Ignore)
}

pub fn default_factory() -> ConfigurationFactory {
    Arc::new(default_configuration)
}
