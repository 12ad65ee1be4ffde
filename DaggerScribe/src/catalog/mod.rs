//! Read-only lookup catalogs shared across decodes

pub mod hashes;
pub mod indices;

pub use hashes::VarHashCatalog;
pub use indices::{IndexCatalog, IndexSpan};
