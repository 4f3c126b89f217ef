//! Span bookkeeping and text editing for typestrip.
//!
//! The transformer never reprints a syntax tree. Instead it records which byte
//! ranges of the original text must disappear or change, and this crate applies
//! those edits in one pass so that everything else is copied verbatim.

mod edit;
mod line_index;
mod span;

pub use edit::{Applied, Edit, EditSet};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
