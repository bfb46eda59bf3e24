pub mod catalog;
pub mod context;
pub mod processor;
pub mod proposal;

// Re-export main types
pub use catalog::TaskCatalog;
pub use context::CursorContext;
pub use processor::AntCompletionProcessor;
pub use proposal::{Proposal, ProposalKind, insert_text};
