//! cssvar - extract literal style values into CSS custom properties
//!
//! cssvar walks a tree of CSS/SCSS files, replaces the values of selected
//! properties with `var(--name)` references and collects the definitions into
//! a generated `:root` stylesheet.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (classification, naming, rewriting, output)

pub mod cli;
pub mod config;
pub mod core;
