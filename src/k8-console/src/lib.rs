//!
//! # Plugin console views
//!
//! Generic list, detail, create and edit views derived from plugin resource
//! schemas, and dispatch to registered custom components.
//!
mod components;
mod context;
mod create;
mod detail;
mod dispatch;
mod edit;
mod error;
mod form;
mod list;
mod message;
mod route;

#[cfg(test)]
pub(crate) mod fixture;

pub use components::ComponentLoader;
pub use components::ComponentRegistry;
pub use components::CustomComponent;
pub use context::ConsoleContext;
pub use create::CreateView;
pub use detail::DetailField;
pub use detail::DetailGroup;
pub use detail::DetailView;
pub use detail::DisplayValue;
pub use dispatch::Dispatcher;
pub use dispatch::GenericView;
pub use dispatch::ResolvedView;
pub use dispatch::ViewSelection;
pub use edit::EditView;
pub use error::ViewError;
pub use form::strip_empty;
pub use form::FormState;
pub use list::ListCell;
pub use list::ListRow;
pub use list::ListView;
pub use message::MessageLevel;
pub use message::ViewMessage;
pub use route::RouteContext;
