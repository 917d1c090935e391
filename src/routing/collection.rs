//! Named, ordered route table.
//!
//! Names are unique (case-insensitive). Registering a second route under a
//! name that is already taken fails; nothing is overwritten.

use std::sync::Arc;

use tracing::debug;

use super::error::RouteError;
use super::route::{HttpRoute, RouteData};

#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    routes: Vec<(String, Arc<HttpRoute>)>,
}

impl RouteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, route: HttpRoute) -> Result<(), RouteError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(RouteError::DuplicateRouteName(name));
        }

        debug!(route = %name, template = route.route_template(), "route registered");
        self.routes.push((name, Arc::new(route)));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<HttpRoute>> {
        self.routes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, route)| route)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<HttpRoute>)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route (in registration order) that matches `path`.
    pub fn get_route_data(&self, path: &str) -> Option<RouteData> {
        self.routes
            .iter()
            .find_map(|(_, route)| route.get_route_data(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut routes = RouteCollection::new();
        routes.add("widgets", HttpRoute::new("widgets/{id}").unwrap()).unwrap();

        let err = routes
            .add("Widgets", HttpRoute::new("other/{id}").unwrap())
            .unwrap_err();

        assert_eq!(RouteError::DuplicateRouteName("Widgets".into()), err);
        assert_eq!(1, routes.len());
        assert_eq!(
            "widgets/{id}",
            routes.get("widgets").unwrap().route_template()
        );
    }

    #[test]
    fn first_matching_route_wins() {
        let mut routes = RouteCollection::new();
        routes.add("specific", HttpRoute::new("widgets/latest").unwrap()).unwrap();
        routes.add("generic", HttpRoute::new("widgets/{id}").unwrap()).unwrap();

        let data = routes.get_route_data("widgets/latest").unwrap();
        assert_eq!("widgets/latest", data.route().route_template());

        let data = routes.get_route_data("widgets/9").unwrap();
        assert_eq!(Some("9"), data.get("id"));

        assert_eq!(vec!["specific", "generic"], routes.names().collect::<Vec<_>>());
    }
}
