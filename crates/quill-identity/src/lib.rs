// src/lib.rs
//
// Shared identity primitives for the quill front end.
// Defines Name, Segment, ItemId and Span as foundational values.

mod item_id;
mod name;
mod span;

pub use item_id::{ItemId, Segment};
pub use name::Name;
pub use span::Span;
