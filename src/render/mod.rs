//! Source emission.
//!
//! The generators in this crate only build a [`Bundle`]; turning that tree
//! into text is the job of a backend. Backends own syntax, formatting and
//! imports, and must not reorder declarations.

pub mod rust;

use crate::decl::Bundle;

pub use rust::RustBackend;

pub trait Backend {
    fn render(&self, bundle: &Bundle) -> String;
}
