pub mod catalog;
pub mod document;
pub mod entry;
pub mod fields;
pub mod media;
pub mod normalize;
pub mod update;

pub use catalog::{CatalogSnapshot, Credit, MovieDetail, SearchResult, SeriesDetail};
pub use document::{Document, Predicate};
pub use entry::{EntryDraft, ListEntry};
pub use media::{MediaKind, WatchStatus};
pub use update::EntryUpdate;
