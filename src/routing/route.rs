/*
 * Responsibility
 * - HttpRoute: template + defaults
 * - RouteData: values resolved for one request, bound to the route that produced them
 */
use std::sync::Arc;

use super::error::RouteError;
use super::template::RouteTemplate;
use super::values::RouteValueDictionary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRoute {
    template: RouteTemplate,
    defaults: RouteValueDictionary,
}

impl HttpRoute {
    pub fn new(template: &str) -> Result<Self, RouteError> {
        Self::with_defaults(template, RouteValueDictionary::new())
    }

    pub fn with_defaults(template: &str, defaults: RouteValueDictionary) -> Result<Self, RouteError> {
        Ok(Self {
            template: RouteTemplate::parse(template)?,
            defaults,
        })
    }

    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    pub fn route_template(&self) -> &str {
        self.template.as_str()
    }

    pub fn defaults(&self) -> &RouteValueDictionary {
        &self.defaults
    }

    /// Resolves `path` against this route. `None` means "no match".
    pub fn get_route_data(self: &Arc<Self>, path: &str) -> Option<RouteData> {
        self.template
            .match_path(path, &self.defaults)
            .map(|values| RouteData {
                route: Arc::clone(self),
                values,
            })
    }
}

/// Route values resolved for a request.
///
/// Attached to every request the driver dispatches; handlers can pull it out
/// of the request extensions (or with the `RouteData` extractor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteData {
    route: Arc<HttpRoute>,
    values: RouteValueDictionary,
}

impl RouteData {
    /// Route data carrying no values, used when the request did not match.
    pub fn empty(route: Arc<HttpRoute>) -> Self {
        Self {
            route,
            values: RouteValueDictionary::new(),
        }
    }

    pub fn route(&self) -> &HttpRoute {
        &self.route
    }

    pub fn values(&self) -> &RouteValueDictionary {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get_str(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteValue;

    fn widgets_route() -> Arc<HttpRoute> {
        let defaults = RouteValueDictionary::new()
            .with("controller", "widgets")
            .with("id", RouteValue::Optional);
        Arc::new(HttpRoute::with_defaults("widgets/{id}", defaults).unwrap())
    }

    #[test]
    fn route_data_is_bound_to_its_route() {
        let route = widgets_route();
        let data = route.get_route_data("/widgets/42").unwrap();

        assert_eq!("widgets/{id}", data.route().route_template());
        assert_eq!(Some("42"), data.get("id"));
        assert_eq!(Some("widgets"), data.get("controller"));
    }

    #[test]
    fn no_match_returns_none() {
        assert!(widgets_route().get_route_data("/gadgets/42").is_none());
    }

    #[test]
    fn empty_route_data_keeps_the_route() {
        let route = widgets_route();
        let data = RouteData::empty(Arc::clone(&route));

        assert!(data.is_empty());
        assert_eq!(route.as_ref(), data.route());
    }
}
