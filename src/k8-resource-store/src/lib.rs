mod nothing;
mod in_memory;
mod store;

pub use store::ResourceStore;
pub use store::StoreError;
pub use nothing::DoNothingStore;
pub use nothing::DoNothingError;
pub use in_memory::InMemoryStore;
pub use in_memory::InMemoryError;

pub type SharedStore<S> = std::sync::Arc<S>;
