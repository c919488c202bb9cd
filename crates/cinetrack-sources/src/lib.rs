pub mod catalog;
pub mod error;
pub mod factory;
pub mod store;

pub use catalog::tmdb::TmdbClient;
pub use catalog::CatalogClient;
pub use error::{CatalogError, StoreError};
pub use factory::{create_catalog, open_local_store};
pub use store::local::LocalStore;
pub use store::{DocumentStore, SnapshotResult, StoreSubscription};
