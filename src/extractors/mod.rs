/**
 * Responsibility
 *  - bundle core and properties
 *  - control what handlers under test can see
 */
mod core;
mod properties;

pub use self::core::RequestConfiguration;
pub use properties::RequestPropertiesExt;
