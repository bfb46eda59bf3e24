pub mod position;
pub mod store;
pub mod text;

// Re-export main types
pub use position::{PositionMapper, compute_line_starts};
pub use store::{DocumentHandle, DocumentStore};
pub use text::Document;
