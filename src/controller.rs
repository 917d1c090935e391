/*
 * Responsibility
 * - ControllerType: describes an endpoint group by name only
 * - route name derivation ("WidgetsController" -> "widgets")
 * - default route template + defaults for a controller
 */
use std::any::type_name;
use std::borrow::Cow;

use crate::routing::{HttpRoute, RouteError, RouteValue, RouteValueDictionary};

const CONTROLLER_SUFFIX: &str = "controller";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerType {
    name: Cow<'static, str>,
}

impl ControllerType {
    /// Descriptor for `T`, named after the last path segment of its type name
    /// (generic arguments dropped).
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: Cow::Borrowed(simple_type_name(type_name::<T>())),
        }
    }

    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route_name(&self) -> String {
        derive_route_name(&self.name)
    }

    pub fn default_template(&self) -> String {
        format!("{}/{{id}}", self.route_name())
    }

    /// `controller = <route name>`, `id = Optional`.
    pub fn route_defaults(&self) -> RouteValueDictionary {
        RouteValueDictionary::new()
            .with("controller", self.route_name())
            .with("id", RouteValue::Optional)
    }

    pub fn route(&self, template: &str) -> Result<HttpRoute, RouteError> {
        HttpRoute::with_defaults(template, self.route_defaults())
    }
}

/// Lowercases `type_name` and strips a trailing "controller".
pub fn derive_route_name(type_name: &str) -> String {
    let mut name = type_name.to_lowercase();
    let len = name
        .strip_suffix(CONTROLLER_SUFFIX)
        .map_or(name.len(), str::len);
    name.truncate(len);
    name
}

fn simple_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[allow(dead_code)]
    struct WidgetsController;
    #[allow(dead_code)]
    struct Wrapper<T>(T);

    #[rstest]
    #[case("WidgetsController", "widgets")]
    #[case("Widgets", "widgets")]
    #[case("WIDGETSCONTROLLER", "widgets")]
    #[case("ControllerWidgets", "controllerwidgets")]
    #[case("Controller", "")]
    fn derives_route_names(#[case] type_name: &str, #[case] expected: &str) {
        assert_eq!(expected, derive_route_name(type_name));
    }

    #[test]
    fn descriptor_from_type_uses_simple_name() {
        let controller = ControllerType::of::<WidgetsController>();

        assert_eq!("WidgetsController", controller.name());
        assert_eq!("widgets", controller.route_name());
        assert_eq!("widgets/{id}", controller.default_template());
    }

    #[test]
    fn generic_arguments_are_dropped() {
        let controller = ControllerType::of::<Wrapper<WidgetsController>>();
        assert_eq!("Wrapper", controller.name());
    }

    #[test]
    fn default_route_marks_id_optional() {
        let route = ControllerType::named("WidgetsController")
            .route("widgets/{id}")
            .unwrap();

        assert_eq!(Some("widgets"), route.defaults().get_str("controller"));
        assert!(route.defaults().get("id").is_some_and(RouteValue::is_optional));
    }
}
