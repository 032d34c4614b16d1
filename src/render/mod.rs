//! Virtual tree, diffing and the host that owns a rendered root.

pub mod diff;
pub mod host;
pub mod node;

pub use diff::{apply, diff, Patch};
pub use host::{Commit, ViewHost};
pub use node::{el, text, Element, Node};
