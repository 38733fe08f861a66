//!
//! # Plugin resource schema
//!
//! Schema model and parsers for plugin defined custom resources
//!
mod crd;
mod defaults;
mod error;
pub mod format;
mod instance;
pub mod layout;
mod path;
mod plugin;
mod schema;

pub use self::crd::*;
pub use self::defaults::build_default;
pub use self::error::PathError;
pub use self::error::SchemaError;
pub use self::instance::*;
pub use self::path::resolve;
pub use self::path::PathExpr;
pub use self::plugin::*;
pub use self::schema::*;
