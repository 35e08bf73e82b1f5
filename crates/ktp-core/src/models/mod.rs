pub mod content_type;
pub mod context;
pub mod file;
pub mod preview;

pub use content_type::content_type_for_filename;
pub use context::ResourceContext;
pub use file::{FileId, FileMetadata, FileRecord};
pub use preview::PreviewKind;
