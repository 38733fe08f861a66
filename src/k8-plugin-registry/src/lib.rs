//!
//! # Plugin registry
//!
//! Loads plugin bundles from configured sources and projects navigation
//!
mod error;
mod nav;
mod registry;
mod source;

pub use error::BundleError;
pub use error::FetchError;
pub use nav::NavGroup;
pub use nav::NavItem;
pub use registry::KindRef;
pub use registry::PluginRegistry;
pub use source::sources_from_config;
pub use source::BundleSource;
pub use source::FileBundleSource;
pub use source::StaticBundleSource;

pub type SharedRegistry = std::sync::Arc<PluginRegistry>;
