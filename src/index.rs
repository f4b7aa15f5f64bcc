//! Compressed inverted-list store: posting serialization, single-writer
//! builder, immutable random-access index, and the lazy decode cursor.

pub mod builder;
pub mod compressed;
pub mod posting;

pub use builder::IndexBuilder;
pub use compressed::{CompressedIndex, ListBytes};
pub use posting::DocumentEnumerator;
