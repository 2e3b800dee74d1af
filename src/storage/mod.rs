pub mod archive;
pub mod json_store;

pub use archive::ArchiveExtractor;
pub use json_store::CatalogStore;
