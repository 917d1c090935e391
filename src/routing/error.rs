/*
 * Responsibility
 * - errors the routing layer reports upward
 * - template syntax errors / route name collisions
 */
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid route template `{template}`: {reason}")]
    InvalidTemplate {
        template: String,
        reason: &'static str,
    },
    #[error("a route named `{0}` is already in the route collection")]
    DuplicateRouteName(String),
}

impl RouteError {
    pub(crate) fn invalid(template: &str, reason: &'static str) -> Self {
        Self::InvalidTemplate {
            template: template.to_owned(),
            reason,
        }
    }
}
