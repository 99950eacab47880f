//! NEDA: Nested Expression Display Algorithm. The expression tree that is
//! simultaneously a layout description, a cursor-navigable document, and the
//! evaluator's direct input (§3, §4.1).

pub mod arena;
pub mod cursor;
pub mod node;
pub mod render;
pub mod tree;

pub use arena::{NedaArena, NodeId};
pub use cursor::{Cursor, CursorLocation};
pub use node::{BracketKind, NedaChild, NodeKind};
pub use tree::NedaTree;
