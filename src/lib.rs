pub mod completion;
pub mod config;
pub mod document;
pub mod error;
pub mod lsp;
pub mod model;

// Re-export the main server implementation
pub use lsp::AntLs;
