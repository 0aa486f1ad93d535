//! repoclip: choose which files of an analyzed repository to export.
//!
//! A [`SelectionSession`] owns the file tree, the extension index and the
//! per-file checked flags of one analysis. Edits at file, directory,
//! extension or select-all granularity go through the session's `toggle_*`
//! methods, which keep the tree view and the extension view consistent.

pub mod config;
pub mod error;
pub mod export;
pub mod extension_index;
pub mod file_scanner;
pub mod raw_tree;
pub mod selection;
pub mod session;
pub mod sync;
pub mod tree_builder;
pub mod tree_model;

pub use error::{Result, SelectionError};
pub use export::ExportSelection;
pub use raw_tree::RawNode;
pub use selection::SelectionState;
pub use session::SelectionSession;
