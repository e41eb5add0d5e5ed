//! Document model types for hOCR content representation.
//!
//! The model is a strict containment tree,
//! `Document -> Page -> Line -> Word -> Character`, built fresh by every
//! parse. Geometry and confidence stay in each node's [`Properties`] and
//! are read on demand, so one malformed clause never prevents the rest of
//! the tree from being built.
//!
//! [`Properties`]: crate::properties::Properties

mod document;
mod line;
mod page;
mod word;

pub use document::Document;
pub use line::{Line, LineKind};
pub use page::Page;
pub use word::{Character, NodeRole, Word};
