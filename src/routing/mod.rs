/*
 * Responsibility
 * - routing collaborator used by the driver (templates, route data, route table)
 * - re-export only what handlers and tests need
 */
mod collection;
mod error;
mod route;
mod template;
mod values;

pub use collection::RouteCollection;
pub use error::RouteError;
pub use route::{HttpRoute, RouteData};
pub use template::{RouteTemplate, TemplateSegment};
pub use values::{RouteValue, RouteValueDictionary};
