mod lsp_impl;
mod text_sync;

pub use lsp_impl::AntLs;
