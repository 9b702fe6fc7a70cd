//! Content services: slug derivation, rich-text filtering, listing queries,
//! relation loading and admin ordering.

pub mod filter;
pub mod listing;
pub mod ordering;
pub mod relations;
pub mod resolve;
pub mod slug;

pub use filter::sanitize_rich_text;
pub use listing::{ListingFilter, ListingTable};
pub use relations::LinkTable;
pub use resolve::{ResolveError, SlugFields};
pub use slug::slugify;
