//! Core extraction engine.
//!
//! ## Pipeline
//!
//! ```text
//! file_scanner (ordered paths)
//!     ↓
//! stylesheet (parse) → rewrite (classify, naming, ledger) → stylesheet (print)
//!     ↓
//! assemble (variable sheet, usage map, asset sheet)
//! ```
//!
//! `context::ExtractContext` drives the pipeline and owns the per-run state.

pub mod assemble;
pub mod assets;
pub mod classify;
pub mod context;
pub mod file_scanner;
pub mod ledger;
pub mod naming;
pub mod rewrite;
pub mod stylesheet;
pub mod types;

pub use context::ExtractContext;
pub use naming::{DeclarationContext, NameStrategy};
pub use types::*;
