//! Navigation menu: link paths and tree assembly.
//!
//! Menu items form a forest through their optional parent. The public API
//! serves it as nested JSON, starting from the top-level items of one
//! language.

pub mod link;
mod tree;

pub use link::{API_PREFIX, page_detail_path, public_link};
pub use tree::{MenuNode, MenuRow, MenuTree};
