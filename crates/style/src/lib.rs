//! Style specifications and their application to a formatting sink.
//!
//! A [`Style`] is an ordered list of characteristic assignments. While the
//! processor walks a flow object, the object's style is pushed onto the
//! current connection's [`StyleStack`] through a [`StyleResolver`], which
//! is also responsible for issuing the matching `set_*` calls on the sink.

pub mod parsers;
pub mod resolver;
pub mod stack;
pub mod stylesheet;

pub use parsers::StyleParseError;
pub use resolver::{InheritedStyleResolver, StyleResolver};
pub use stack::{StyleEntry, StyleStack};
pub use stylesheet::{Style, Stylesheet};
