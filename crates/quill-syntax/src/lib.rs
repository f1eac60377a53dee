// src/lib.rs
//
// Syntax tree for quill scripts. Parsing lives upstream; this crate only
// defines the closed node enums the analyzer matches on, plus a builder that
// allocates node identities.

pub mod ast;
mod builder;

pub use ast::*;
pub use builder::SyntaxBuilder;
pub use quill_identity::{Name, Span};
